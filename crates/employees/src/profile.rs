use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use staffgate_core::{DomainError, EmployeeId};

/// Department an employee belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Engineering,
    Procurement,
    Finance,
    Construction,
    Hse,
}

/// Employment contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

/// Employee lifecycle status.
///
/// Records are never hard-deleted; leavers move to `Inactive`/`Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

/// An employee's profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub department: Department,
    pub job_title: String,
    pub employment_type: EmploymentType,
    pub status: EmployeeStatus,
    pub join_date: NaiveDate,
}

/// Input for creating a new employee (onboarding form payload).
///
/// The employee id is assigned by the directory, not supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub email: String,
    pub department: Department,
    pub job_title: String,
    pub employment_type: EmploymentType,
    pub join_date: NaiveDate,
}

impl NewEmployee {
    /// Validate form-level constraints before a record is created.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.full_name.trim().is_empty() {
            return Err(DomainError::validation("full name cannot be empty"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if self.job_title.trim().is_empty() {
            return Err(DomainError::validation("job title cannot be empty"));
        }
        Ok(())
    }

    /// Materialize a profile under the given id.
    pub fn into_profile(self, employee_id: EmployeeId) -> EmployeeProfile {
        EmployeeProfile {
            employee_id,
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            department: self.department,
            job_title: self.job_title.trim().to_string(),
            employment_type: self.employment_type,
            status: EmployeeStatus::Active,
            join_date: self.join_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_employee() -> NewEmployee {
        NewEmployee {
            full_name: "  Amira Khan ".to_string(),
            email: "Amira.Khan@Example.com".to_string(),
            department: Department::Engineering,
            job_title: "Site Engineer".to_string(),
            employment_type: EmploymentType::FullTime,
            join_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[test]
    fn into_profile_normalizes_fields() {
        let profile = new_employee().into_profile(EmployeeId::from_sequence(1));
        assert_eq!(profile.full_name, "Amira Khan");
        assert_eq!(profile.email, "amira.khan@example.com");
        assert_eq!(profile.status, EmployeeStatus::Active);
    }

    #[test]
    fn validate_rejects_bad_email() {
        let mut input = new_employee();
        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut input = new_employee();
        input.full_name = "   ".to_string();
        assert!(input.validate().is_err());
    }
}
