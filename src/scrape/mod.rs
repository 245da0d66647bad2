pub mod parsers;
pub mod skill_order;
