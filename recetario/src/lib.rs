pub mod basic_models;
pub mod display;
pub mod filters;
pub mod form;
