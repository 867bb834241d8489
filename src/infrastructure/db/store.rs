use crate::modules::course::repository::CourseRepository;
use crate::modules::link::repository::LinkRepository;

/// Everything the services and workers need from persistence.
pub trait Store: LinkRepository + CourseRepository {}

impl<T> Store for T where T: LinkRepository + CourseRepository {}
