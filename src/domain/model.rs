use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    course_code: String,
    course_name: String,
}

impl Course {
    pub fn new(course_code: impl Into<String>, course_name: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: course_name.into(),
        }
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.course_code, self.course_name)
    }
}

/// A student and the numeric grades recorded for them, keyed by course code.
///
/// Grades keep the order in which they were first recorded. Scores are not
/// range-checked here; adapters validate input before it reaches the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    student_id: String,
    student_name: String,
    #[serde(default)]
    grades: IndexMap<String, f64>,
}

impl Student {
    pub fn new(student_id: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            student_name: student_name.into(),
            grades: IndexMap::new(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Records `score` for `course_code`, silently replacing any previous grade.
    pub fn add_grade(&mut self, course_code: impl Into<String>, score: f64) {
        self.grades.insert(course_code.into(), score);
    }

    pub fn grade(&self, course_code: &str) -> Option<f64> {
        self.grades.get(course_code).copied()
    }

    /// Returns a copy of the grade map; changes to it never reach the student.
    pub fn all_grades(&self) -> IndexMap<String, f64> {
        self.grades.clone()
    }

    pub(crate) fn grades(&self) -> impl Iterator<Item = (&str, f64)> {
        self.grades.iter().map(|(code, score)| (code.as_str(), *score))
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.student_id, self.student_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_grade_overwrites_in_place() {
        let mut student = Student::new("S1", "Ada");
        student.add_grade("CS101", 55.0);
        student.add_grade("MA201", 70.0);
        student.add_grade("CS101", 91.0);

        assert_eq!(student.grade("CS101"), Some(91.0));
        let order: Vec<&str> = student.grades().map(|(code, _)| code).collect();
        assert_eq!(order, vec!["CS101", "MA201"]);
    }

    #[test]
    fn test_grade_lookup_absent() {
        let student = Student::new("S1", "Ada");
        assert_eq!(student.grade("CS101"), None);
    }

    #[test]
    fn test_all_grades_is_a_copy() {
        let mut student = Student::new("S1", "Ada");
        student.add_grade("CS101", 65.0);

        let mut copy = student.all_grades();
        copy.insert("CS101".to_string(), 0.0);
        copy.insert("PH100".to_string(), 10.0);

        assert_eq!(student.grade("CS101"), Some(65.0));
        assert_eq!(student.grade("PH100"), None);
    }

    #[test]
    fn test_out_of_range_scores_are_stored() {
        let mut student = Student::new("S1", "Ada");
        student.add_grade("CS101", 150.0);
        student.add_grade("MA201", -10.0);
        assert_eq!(student.grade("CS101"), Some(150.0));
        assert_eq!(student.grade("MA201"), Some(-10.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Student::new("S1", "Ada").to_string(), "S1: Ada");
        assert_eq!(Course::new("CS101", "Intro").to_string(), "CS101: Intro");
    }
}
