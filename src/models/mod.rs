pub mod auth;
pub mod course;
pub mod material;
pub mod question;
pub mod quiz;
pub mod snippet;
pub mod subject;

pub use auth::{AuthState, AuthStatusResponse, LoginForm, SignupForm};
pub use course::{Course, CourseForm, CoursePatch};
pub use material::{ClassMaterial, MaterialUpload};
pub use question::{Question, QuestionRecord, QuestionType, CHOICE_DELIMITER};
pub use quiz::{Quiz, QuizConfigForm, QuizResponse};
pub use snippet::MaterialSnippet;
pub use subject::Subject;
