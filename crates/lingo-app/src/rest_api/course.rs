#[cfg(feature = "openapi")]
use lingo_dal::course::Course;
use lingo_dal::course::{CourseRepository, CreateCourse, UpdateCourse};

crate::crud_api!(Course, CourseRepository, CreateCourse, UpdateCourse);
