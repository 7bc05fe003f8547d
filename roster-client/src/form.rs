//! Employee form - raw user input and its validation.
//!
//! The form holds what the user typed, as text. [`EmployeeForm::validate`]
//! turns it into an [`EmployeeDraft`] or reports every malformed field at
//! once, before anything is sent to the server.

use std::fmt;

use serde::Deserialize;
use shared::{Employee, EmployeeDraft, Experience, SalaryRecord};
use thiserror::Error;

/// One previous-experience row as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceRow {
    pub company: String,
    pub position: String,
    pub years: String,
}

/// One salary-history row as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryRow {
    pub year: String,
    pub salary: String,
    pub currency: String,
    pub position: String,
}

/// Text fields addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Address,
    PhoneNumber,
    GovernmentId,
    CurrentPositionDetails,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::Name,
        TextField::Address,
        TextField::PhoneNumber,
        TextField::GovernmentId,
        TextField::CurrentPositionDetails,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Address => "address",
            TextField::PhoneNumber => "phone_number",
            TextField::GovernmentId => "government_id",
            TextField::CurrentPositionDetails => "current_position_details",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `salary_history[1].year`
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Invalid input: {}", join(.0))]
    Invalid(Vec<FieldError>),

    #[error("{field} must be a JSON array of objects: {message}")]
    Json { field: &'static str, message: String },
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Editable employee fields, as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub government_id: String,
    pub current_position_details: String,
    pub previous_experience: Vec<ExperienceRow>,
    pub salary_history: Vec<SalaryRow>,
}

impl EmployeeForm {
    /// Empty form for a new employee
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with every field of an existing record
    pub fn from_employee(employee: &Employee) -> Self {
        let f = &employee.fields;
        Self {
            name: f.name.clone(),
            address: f.address.clone(),
            phone_number: f.phone_number.clone(),
            government_id: f.government_id.clone(),
            current_position_details: f.current_position_details.clone(),
            previous_experience: f
                .previous_experience
                .iter()
                .map(|e| ExperienceRow {
                    company: e.company.clone(),
                    position: e.position.clone(),
                    years: e.years.to_string(),
                })
                .collect(),
            salary_history: f
                .salary_history
                .iter()
                .map(|s| SalaryRow {
                    year: s.year.to_string(),
                    salary: s.salary.to_string(),
                    currency: s.currency.clone(),
                    position: s.position.clone(),
                })
                .collect(),
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Address => &self.address,
            TextField::PhoneNumber => &self.phone_number,
            TextField::GovernmentId => &self.government_id,
            TextField::CurrentPositionDetails => &self.current_position_details,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::Name => &mut self.name,
            TextField::Address => &mut self.address,
            TextField::PhoneNumber => &mut self.phone_number,
            TextField::GovernmentId => &mut self.government_id,
            TextField::CurrentPositionDetails => &mut self.current_position_details,
        };
        *slot = value.into();
    }

    /// Replaces the experience rows from a JSON array such as
    /// `[{"company": "Acme", "position": "Dev", "years": 3}]`.
    ///
    /// Only the JSON shape is checked here; values are checked by
    /// [`validate`](Self::validate). On error the rows are unchanged.
    pub fn set_experience_json(&mut self, json: &str) -> Result<(), FormError> {
        #[derive(Deserialize)]
        struct Raw {
            company: String,
            position: String,
            years: serde_json::Value,
        }
        let rows: Vec<Raw> = parse_rows("previous_experience", json)?;
        self.previous_experience = rows
            .into_iter()
            .map(|r| ExperienceRow {
                company: r.company,
                position: r.position,
                years: scalar_text(&r.years),
            })
            .collect();
        Ok(())
    }

    /// Replaces the salary rows from a JSON array such as
    /// `[{"year": 2023, "salary": 50000, "currency": "USD", "position": "Dev"}]`.
    pub fn set_salary_json(&mut self, json: &str) -> Result<(), FormError> {
        #[derive(Deserialize)]
        struct Raw {
            year: serde_json::Value,
            salary: serde_json::Value,
            currency: String,
            position: String,
        }
        let rows: Vec<Raw> = parse_rows("salary_history", json)?;
        self.salary_history = rows
            .into_iter()
            .map(|r| SalaryRow {
                year: scalar_text(&r.year),
                salary: scalar_text(&r.salary),
                currency: r.currency,
                position: r.position,
            })
            .collect();
        Ok(())
    }

    /// Checks every field and builds the draft to submit
    pub fn validate(&self) -> Result<EmployeeDraft, FormError> {
        let mut errors = Vec::new();
        let mut reject = |field: String, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        if self.name.trim().is_empty() {
            reject("name".into(), "is required");
        }

        let mut previous_experience = Vec::with_capacity(self.previous_experience.len());
        for (i, row) in self.previous_experience.iter().enumerate() {
            let at = |f: &str| format!("previous_experience[{i}].{f}");
            if row.company.trim().is_empty() {
                reject(at("company"), "is required");
            }
            if row.position.trim().is_empty() {
                reject(at("position"), "is required");
            }
            match row.years.trim().parse::<f64>() {
                Ok(years) if years.is_finite() && years >= 0.0 => {
                    previous_experience.push(Experience {
                        company: row.company.trim().to_string(),
                        position: row.position.trim().to_string(),
                        years,
                    });
                }
                _ => reject(at("years"), "must be a non-negative number"),
            }
        }

        let mut salary_history = Vec::with_capacity(self.salary_history.len());
        for (i, row) in self.salary_history.iter().enumerate() {
            let at = |f: &str| format!("salary_history[{i}].{f}");
            let year = row.year.trim().parse::<i32>().ok().filter(|y| *y > 0);
            if year.is_none() {
                reject(at("year"), "must be a positive whole year");
            }
            let salary = row
                .salary
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0);
            if salary.is_none() {
                reject(at("salary"), "must be a non-negative number");
            }
            let currency = row.currency.trim();
            if currency.is_empty() {
                reject(at("currency"), "is required");
            }
            if row.position.trim().is_empty() {
                reject(at("position"), "is required");
            }
            if let (Some(year), Some(salary)) = (year, salary) {
                salary_history.push(SalaryRecord {
                    year,
                    salary,
                    currency: currency.to_uppercase(),
                    position: row.position.trim().to_string(),
                });
            }
        }

        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }

        Ok(EmployeeDraft {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            government_id: self.government_id.trim().to_string(),
            current_position_details: self.current_position_details.trim().to_string(),
            previous_experience,
            salary_history,
        })
    }
}

fn parse_rows<T: serde::de::DeserializeOwned>(
    field: &'static str,
    json: &str,
) -> Result<Vec<T>, FormError> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).map_err(|e| FormError::Json {
        field,
        message: e.to_string(),
    })
}

/// Numbers and strings are both accepted as text; validation parses them later
fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EmployeeForm {
        EmployeeForm {
            name: " Ada ".into(),
            address: "London".into(),
            phone_number: "555".into(),
            government_id: "X1".into(),
            current_position_details: "Analyst".into(),
            previous_experience: vec![ExperienceRow {
                company: "Engines".into(),
                position: "Programmer".into(),
                years: "2.5".into(),
            }],
            salary_history: vec![SalaryRow {
                year: "1843".into(),
                salary: "1200".into(),
                currency: "gbp".into(),
                position: "Programmer".into(),
            }],
        }
    }

    #[test]
    fn test_valid_form_builds_draft() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.previous_experience[0].years, 2.5);
        assert_eq!(draft.salary_history[0].year, 1843);
        assert_eq!(draft.salary_history[0].currency, "GBP");
    }

    #[test]
    fn test_name_is_required() {
        let form = EmployeeForm::new();
        match form.validate() {
            Err(FormError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_all_bad_fields_are_reported() {
        let mut form = filled();
        form.previous_experience[0].years = "many".into();
        form.salary_history[0].year = "-3".into();
        form.salary_history[0].salary = "lots".into();
        form.salary_history[0].currency = " ".into();

        let Err(FormError::Invalid(errors)) = form.validate() else {
            panic!("expected invalid form");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "previous_experience[0].years",
                "salary_history[0].year",
                "salary_history[0].salary",
                "salary_history[0].currency",
            ]
        );
    }

    #[test]
    fn test_round_trip_through_employee() {
        let draft = filled().validate().unwrap();
        let employee = draft.clone().with_id(1);
        let form = EmployeeForm::from_employee(&employee);
        assert_eq!(form.validate().unwrap(), draft);
    }

    #[test]
    fn test_json_rows_accept_numbers_and_strings() {
        let mut form = filled();
        form.set_experience_json(r#"[{"company": "Acme", "position": "Dev", "years": "3"}]"#)
            .unwrap();
        form.set_salary_json(
            r#"[{"year": 2023, "salary": 50000.5, "currency": "USD", "position": "Dev"}]"#,
        )
        .unwrap();
        let draft = form.validate().unwrap();
        assert_eq!(draft.previous_experience[0].years, 3.0);
        assert_eq!(draft.salary_history[0].salary, 50000.5);
    }

    #[test]
    fn test_malformed_json_keeps_rows() {
        let mut form = filled();
        let before = form.previous_experience.clone();

        assert!(matches!(
            form.set_experience_json("{not json"),
            Err(FormError::Json { field: "previous_experience", .. })
        ));
        assert!(form.set_experience_json(r#"[{"company": "Acme"}]"#).is_err());
        assert!(form.set_experience_json(r#"{"company": "Acme"}"#).is_err());
        assert_eq!(form.previous_experience, before);

        form.set_experience_json("").unwrap();
        assert!(form.previous_experience.is_empty());
    }

    #[test]
    fn test_text_fields_by_key() {
        let mut form = EmployeeForm::new();
        let field = TextField::from_key("phone_number").unwrap();
        form.set_text(field, "555-0100");
        assert_eq!(form.text(TextField::PhoneNumber), "555-0100");
        assert!(TextField::from_key("salary").is_none());
    }
}
