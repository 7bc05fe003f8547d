//! Plain-text rendering of the active view

use std::fmt::Write;

use roster_client::{EmployeeForm, Screen, TextField, ViewError};
use shared::Employee;

/// Renders a screen, ending with the prompt line
pub fn screen(screen: &Screen<'_>) -> String {
    let mut out = String::new();
    match screen {
        Screen::Login { error } => {
            out.push_str("== Login ==\n");
            push_error(&mut out, *error);
            out.push_str("login <username> <password> | register\n");
        }
        Screen::Register { error, registered } => {
            out.push_str("== Register ==\n");
            if *registered {
                out.push_str("Registration successful, go back to log in.\n");
            }
            push_error(&mut out, *error);
            out.push_str("register <username> <password> <view|edit> | back\n");
        }
        Screen::List {
            employees,
            loaded,
            can_create,
            pdf_url,
            error,
        } => {
            out.push_str("== Employees ==\n");
            push_error(&mut out, *error);
            if !loaded {
                out.push_str("(loading)\n");
            } else if employees.is_empty() && error.is_none() {
                out.push_str("(no employees)\n");
            }
            for e in employees.iter() {
                let _ = writeln!(
                    out,
                    "{:>5}  {:<24}  {}",
                    e.id,
                    e.name(),
                    e.fields.current_position_details
                );
            }
            let _ = writeln!(out, "PDF: {pdf_url}");
            out.push_str(if *can_create {
                "open <id> | new | pdf | refresh | logout\n"
            } else {
                "open <id> | pdf | refresh | logout\n"
            });
        }
        Screen::Detail {
            id,
            employee,
            can_edit,
            pdf_url,
            error,
        } => {
            let _ = writeln!(out, "== Employee {id} ==");
            push_error(&mut out, *error);
            if let Some(employee) = employee {
                push_employee(&mut out, employee);
            }
            let _ = writeln!(out, "PDF: {pdf_url}");
            out.push_str(if *can_edit {
                "back | edit | delete | pdf | refresh | logout\n"
            } else {
                "back | pdf | refresh | logout\n"
            });
        }
        Screen::Form {
            form,
            editing,
            error,
        } => {
            match editing {
                Some(id) => {
                    let _ = writeln!(out, "== Edit employee {id} ==");
                }
                None => out.push_str("== New employee ==\n"),
            }
            push_error(&mut out, *error);
            push_form(&mut out, form);
            out.push_str("set <field> <value> | save | cancel\n");
        }
    }
    out
}

fn push_error(out: &mut String, error: Option<&ViewError>) {
    if let Some(error) = error {
        let _ = writeln!(out, "! {}", error.message());
    }
}

fn push_employee(out: &mut String, employee: &Employee) {
    let f = &employee.fields;
    let _ = writeln!(out, "Name:      {}", f.name);
    let _ = writeln!(out, "Address:   {}", f.address);
    let _ = writeln!(out, "Phone:     {}", f.phone_number);
    let _ = writeln!(out, "ID number: {}", f.government_id);
    let _ = writeln!(out, "Position:  {}", f.current_position_details);

    out.push_str("Previous experience:\n");
    if f.previous_experience.is_empty() {
        out.push_str("  (none)\n");
    }
    for e in &f.previous_experience {
        let _ = writeln!(out, "  {} at {}, {} years", e.position, e.company, e.years);
    }

    out.push_str("Salary history:\n");
    if f.salary_history.is_empty() {
        out.push_str("  (none)\n");
    }
    for s in &f.salary_history {
        let _ = writeln!(
            out,
            "  {}  {:.2} {}  ({})",
            s.year, s.salary, s.currency, s.position
        );
    }
}

fn push_form(out: &mut String, form: &EmployeeForm) {
    for field in TextField::ALL {
        let _ = writeln!(out, "{:<26} {}", field.key(), form.text(field));
    }
    let _ = writeln!(out, "previous_experience ({} rows)", form.previous_experience.len());
    for (i, row) in form.previous_experience.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{i}] company={} position={} years={}",
            row.company, row.position, row.years
        );
    }
    let _ = writeln!(out, "salary_history ({} rows)", form.salary_history.len());
    for (i, row) in form.salary_history.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{i}] year={} salary={} currency={} position={}",
            row.year, row.salary, row.currency, row.position
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{EmployeeDraft, SalaryRecord};

    fn employee() -> Employee {
        EmployeeDraft {
            name: "Ada Lovelace".into(),
            current_position_details: "Analyst".into(),
            salary_history: vec![SalaryRecord {
                year: 1843,
                salary: 1200.0,
                currency: "GBP".into(),
                position: "Programmer".into(),
            }],
            ..Default::default()
        }
        .with_id(7)
    }

    #[test]
    fn test_empty_list() {
        let text = screen(&Screen::List {
            employees: &[],
            loaded: true,
            can_create: false,
            pdf_url: "http://api/api/employees/pdf".into(),
            error: None,
        });
        assert!(text.contains("(no employees)"));
        assert!(!text.contains("new"));
    }

    #[test]
    fn test_list_rows_and_error() {
        let employees = [employee()];
        let error = ViewError::Load("Failed to load employees: boom".into());
        let text = screen(&Screen::List {
            employees: &employees,
            loaded: true,
            can_create: true,
            pdf_url: String::new(),
            error: Some(&error),
        });
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("! Failed to load employees: boom"));
        assert!(text.contains("| new |"));
    }

    #[test]
    fn test_detail_lists_salary_history() {
        let employee = employee();
        let text = screen(&Screen::Detail {
            id: 7,
            employee: Some(&employee),
            can_edit: true,
            pdf_url: String::new(),
            error: None,
        });
        assert!(text.contains("== Employee 7 =="));
        assert!(text.contains("1843  1200.00 GBP  (Programmer)"));
        assert!(text.contains("edit | delete"));
    }

    #[test]
    fn test_form_shows_field_keys() {
        let form = EmployeeForm::from_employee(&employee());
        let text = screen(&Screen::Form {
            form: &form,
            editing: Some(7),
            error: None,
        });
        assert!(text.contains("== Edit employee 7 =="));
        assert!(text.contains("current_position_details"));
        assert!(text.contains("year=1843 salary=1200"));
    }

    #[test]
    fn test_registration_notice() {
        let text = screen(&Screen::Register {
            error: None,
            registered: true,
        });
        assert!(text.contains("Registration successful"));
    }
}
