pub mod help;
pub mod main;
pub mod sidebar;
