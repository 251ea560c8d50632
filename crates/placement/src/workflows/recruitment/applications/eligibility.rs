use super::domain::{JobRequirements, StudentProfile};

/// First requirement a student fails to meet, kept structured so intake can
/// surface an actionable message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EligibilityFailure {
    #[error("department '{department}' is not among the eligible departments ({allowed})")]
    Department { department: String, allowed: String },
    #[error("year {year} is not among the eligible years")]
    Year { year: u8 },
    #[error("CGPA {actual:.2} is below the required minimum {required:.2}")]
    CgpaBelowMinimum { required: f32, actual: f32 },
}

/// Check a student against a posting's requirements. Each check applies only
/// when the corresponding requirement is non-empty; an unconstrained posting
/// accepts everyone. Pure, no side effects.
pub fn check_eligibility(
    student: &StudentProfile,
    requirements: &JobRequirements,
) -> Result<(), EligibilityFailure> {
    if !requirements.departments.is_empty()
        && !requirements
            .departments
            .iter()
            .any(|department| department.eq_ignore_ascii_case(&student.department))
    {
        return Err(EligibilityFailure::Department {
            department: student.department.clone(),
            allowed: requirements.departments.join(", "),
        });
    }

    if !requirements.years.is_empty() && !requirements.years.contains(&student.year) {
        return Err(EligibilityFailure::Year { year: student.year });
    }

    if let Some(required) = requirements.minimum_cgpa {
        if student.cgpa < required {
            return Err(EligibilityFailure::CgpaBelowMinimum {
                required,
                actual: student.cgpa,
            });
        }
    }

    Ok(())
}

/// Boolean form of the predicate for callers that do not need the reason.
pub fn is_eligible(student: &StudentProfile, requirements: &JobRequirements) -> bool {
    check_eligibility(student, requirements).is_ok()
}
