pub mod company;
pub mod employee;
pub mod project;
pub mod project_wizard;
