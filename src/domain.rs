pub mod entities;
pub mod form_rules;
pub mod use_cases;
