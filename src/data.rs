use crate::error::{InvalidStudentSnafu, RollbookResult};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

/// A persisted student row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Body of a create request. Every field is optional at the wire level so
/// that missing fields surface as aggregated validation problems rather than
/// a decode failure.
#[derive(Deserialize, Debug)]
pub struct NewStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

/// A validated create payload, ready for insertion.
#[derive(Debug)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Body of an update request. Absent fields are left untouched in storage,
/// which is not the same thing as an explicit empty value.
#[derive(Deserialize, Debug, Default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl NewStudent {
    /// Checks every field and reports all violations at once.
    pub fn validate(self) -> RollbookResult<StudentDraft> {
        let mut problems = Vec::new();

        let name = match self.name {
            Some(name) if !name.is_empty() => Some(name),
            _ => {
                problems.push("field name is a required field".to_string());
                None
            }
        };
        let email = match self.email {
            None => {
                problems.push("field email is a required field".to_string());
                None
            }
            Some(email) if !EmailAddress::is_valid(&email) => {
                problems.push("field email is not a valid email address".to_string());
                None
            }
            Some(email) => Some(email),
        };
        let age = self.age;
        if age.is_none() {
            problems.push("field age is a required field".to_string());
        }

        match (name, email, age) {
            (Some(name), Some(email), Some(age)) if problems.is_empty() => {
                Ok(StudentDraft { name, email, age })
            }
            _ => InvalidStudentSnafu { problems }.fail(),
        }
    }
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }

    /// Same per-field rules as [`NewStudent::validate`], applied only to the
    /// fields that are present.
    pub fn validate(&self) -> RollbookResult<()> {
        let mut problems = Vec::new();

        if let Some(name) = &self.name
            && name.is_empty()
        {
            problems.push("field name is a required field".to_string());
        }
        if let Some(email) = &self.email
            && !EmailAddress::is_valid(email)
        {
            problems.push("field email is not a valid email address".to_string());
        }

        snafu::ensure!(problems.is_empty(), InvalidStudentSnafu { problems });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollbookError;

    fn new_student(name: Option<&str>, email: Option<&str>, age: Option<i64>) -> NewStudent {
        NewStudent {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            age,
        }
    }

    #[test]
    fn valid_student_passes() {
        let draft = new_student(Some("Alice"), Some("a@x.com"), Some(20))
            .validate()
            .unwrap();
        assert_eq!(draft.name, "Alice");
        assert_eq!(draft.email, "a@x.com");
        assert_eq!(draft.age, 20);
    }

    #[test]
    fn all_violations_reported_together() {
        let err = new_student(None, Some("not-an-email"), None)
            .validate()
            .unwrap_err();
        let RollbookError::InvalidStudent { problems } = err else {
            panic!("expected InvalidStudent, got {err:?}");
        };
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("name"));
        assert!(problems[1].contains("email"));
        assert!(problems[2].contains("age"));
    }

    #[test]
    fn empty_name_is_missing_name() {
        let err = new_student(Some(""), Some("a@x.com"), Some(20))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("field name is a required field"));
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = StudentPatch {
            age: Some(21),
            ..StudentPatch::default()
        };
        patch.validate().unwrap();
        assert!(!patch.is_empty());
        assert!(StudentPatch::default().is_empty());
    }

    #[test]
    fn patch_rejects_bad_email() {
        let patch = StudentPatch {
            email: Some("nope".to_string()),
            ..StudentPatch::default()
        };
        let err = patch.validate().unwrap_err();
        assert!(err.to_string().contains("valid email address"));
    }
}
