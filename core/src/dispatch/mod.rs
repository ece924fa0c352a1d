pub mod dispatcher;
pub mod paths;
pub mod profiles;

pub use dispatcher::{ConversionDispatcher, DispatchOutcome};
pub use paths::{product_name, OutputFormat, OutputLayout};
pub use profiles::{ParamProfiles, ProfileSet};
