pub mod course;
pub mod link;
