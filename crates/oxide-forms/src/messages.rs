//! Default error messages.

pub const REQUIRED: &str = "Please fill in this field";
pub const REQUIRED_CHECKBOX: &str = "Please check this box if you want to proceed";
pub const REQUIRED_RADIO: &str = "Please select one of the options";
pub const REQUIRED_SELECT: &str = "Please select one of the options";
pub const REQUIRED_SELECT_MULTIPLE: &str = "Please select at least one of the options";
pub const EMAIL: &str = "Please enter a valid email address";
pub const URL: &str = "Please enter a valid url";

pub fn max_length(max: usize) -> String {
    format!("Please shorten this text to {max} characters or less")
}

pub fn min_value(min: f64) -> String {
    format!("Please enter a value greater than or equal to {min}")
}

pub fn max_value(max: f64) -> String {
    format!("Please enter a value less than or equal to {max}")
}
