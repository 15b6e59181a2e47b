#[cfg(feature = "openapi")]
use lingo_dal::subject::Subject;
use lingo_dal::subject::{CreateSubject, SubjectRepository, UpdateSubject};

crate::crud_api!(Subject, SubjectRepository, CreateSubject, UpdateSubject);
