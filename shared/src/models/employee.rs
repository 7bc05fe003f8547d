//! Employee Model

use serde::{Deserialize, Serialize};

use crate::util::{lenient_f64, lenient_i32, null_as_default};

/// Server-assigned employee identifier
pub type EmployeeId = i64;

/// Employee record as stored by the server
///
/// The `id` is assigned on creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(flatten)]
    pub fields: EmployeeDraft,
}

impl Employee {
    pub fn new(id: EmployeeId, fields: EmployeeDraft) -> Self {
        Self { id, fields }
    }

    /// Editable fields of this record, without the id
    pub fn draft(&self) -> EmployeeDraft {
        self.fields.clone()
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }
}

/// Employee fields without an id (create payload, update payload)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub government_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_position_details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub salary_history: Vec<SalaryRecord>,
}

impl EmployeeDraft {
    /// Attach a server-assigned id
    pub fn with_id(self, id: EmployeeId) -> Employee {
        Employee::new(id, self)
    }
}

/// One entry of an employee's previous experience
///
/// Entries written by older clients may hold numbers as strings or leave
/// fields out; they decode to defaults instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub years: f64,
}

/// One entry of an employee's salary history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: i32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub salary: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::WriteAck;

    fn sample() -> EmployeeDraft {
        EmployeeDraft {
            name: "Ada Lovelace".into(),
            address: "12 St James's Square".into(),
            phone_number: "555-0100".into(),
            government_id: "GB-1815".into(),
            current_position_details: "Analyst".into(),
            previous_experience: vec![Experience {
                company: "Analytical Engines".into(),
                position: "Programmer".into(),
                years: 2.5,
            }],
            salary_history: vec![SalaryRecord {
                year: 1843,
                salary: 1200.0,
                currency: "GBP".into(),
                position: "Programmer".into(),
            }],
        }
    }

    #[test]
    fn test_employee_json_is_flat() {
        let employee = sample().with_id(7);
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["salary_history"][0]["currency"], "GBP");
    }

    #[test]
    fn test_draft_has_no_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let json = r#"{
            "id": 3,
            "name": "Grace",
            "address": null,
            "phone_number": null,
            "government_id": null,
            "previous_experience": null,
            "salary_history": [],
            "current_position_details": null
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 3);
        assert_eq!(employee.fields.address, "");
        assert!(employee.fields.previous_experience.is_empty());
    }

    #[test]
    fn test_loosely_stored_entries_decode() {
        let json = r#"[
            {"id": 1, "name": "Ada", "previous_experience": [], "salary_history": []},
            {
                "id": 2,
                "name": "Linus",
                "previous_experience": [
                    {"company": "Acme", "position": "Dev", "years": "3"},
                    {"company": "Initech", "position": null}
                ],
                "salary_history": [
                    {"year": "2022", "salary": "48000.50", "currency": null, "position": "Dev"}
                ]
            }
        ]"#;
        let employees: Vec<Employee> = serde_json::from_str(json).unwrap();
        assert_eq!(employees.len(), 2);

        let f = &employees[1].fields;
        assert_eq!(f.previous_experience[0].years, 3.0);
        assert_eq!(f.previous_experience[1].position, "");
        assert_eq!(f.previous_experience[1].years, 0.0);
        assert_eq!(f.salary_history[0].year, 2022);
        assert_eq!(f.salary_history[0].salary, 48000.5);
        assert_eq!(f.salary_history[0].currency, "");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: Result<Employee, _> = serde_json::from_str(r#"{"id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_ack_variants() {
        let full = serde_json::to_string(&sample().with_id(9)).unwrap();
        assert!(matches!(
            serde_json::from_str::<WriteAck>(&full).unwrap(),
            WriteAck::Record(e) if e.id == 9
        ));
        assert!(matches!(
            serde_json::from_str::<WriteAck>(r#"{"id": 4}"#).unwrap(),
            WriteAck::Created { id: 4 }
        ));
        assert!(matches!(
            serde_json::from_str::<WriteAck>(r#"{"status": "updated"}"#).unwrap(),
            WriteAck::Status { .. }
        ));
    }
}
