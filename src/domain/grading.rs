use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PASS_MARK: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    /// Best to worst.
    pub const ALL: [LetterGrade; 7] = [
        LetterGrade::A,
        LetterGrade::BPlus,
        LetterGrade::BMinus,
        LetterGrade::CPlus,
        LetterGrade::CMinus,
        LetterGrade::E,
        LetterGrade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::CMinus => "C-",
            LetterGrade::E => "E",
            LetterGrade::F => "F",
        }
    }

    /// Weight used in the GPA numerator. F never counts as passing.
    pub fn grade_points(&self) -> f64 {
        match self {
            LetterGrade::A => 5.0,
            LetterGrade::BPlus => 4.5,
            LetterGrade::BMinus => 4.0,
            LetterGrade::CPlus => 3.5,
            LetterGrade::CMinus => 3.0,
            LetterGrade::E => 2.0,
            LetterGrade::F => 0.0,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LetterGrade::ALL
            .into_iter()
            .find(|grade| grade.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown letter grade: {}", s))
    }
}

/// Classifies numeric scores. Thresholds are left-closed and nothing is clamped.
pub struct GradeCategory;

impl GradeCategory {
    pub fn letter_grade(score: f64) -> LetterGrade {
        if score >= 80.0 {
            LetterGrade::A
        } else if score >= 75.0 {
            LetterGrade::BPlus
        } else if score >= 70.0 {
            LetterGrade::BMinus
        } else if score >= 60.0 {
            LetterGrade::CPlus
        } else if score >= 50.0 {
            LetterGrade::CMinus
        } else if score >= PASS_MARK {
            LetterGrade::E
        } else {
            LetterGrade::F
        }
    }

    pub fn is_passing(score: f64) -> bool {
        score >= PASS_MARK
    }
}
