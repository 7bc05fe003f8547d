//! Employee record synchronization
//!
//! One request per call, no retries. Write acknowledgements are reconciled
//! into a full [`Employee`]: the server may echo the record, or answer with
//! just the id (create) or a status (update).

use std::path::Path;

use shared::{Employee, EmployeeDraft, EmployeeId, WriteAck};

use super::EMPLOYEES_PATH;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

/// What a PDF export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfExport {
    /// Every employee
    All,
    /// A single employee
    Employee(EmployeeId),
}

impl PdfExport {
    pub fn path(&self) -> String {
        match self {
            PdfExport::All => format!("{EMPLOYEES_PATH}/pdf"),
            PdfExport::Employee(id) => format!("{EMPLOYEES_PATH}/{id}/pdf"),
        }
    }

    /// Suggested file name for a download
    pub fn file_name(&self) -> String {
        match self {
            PdfExport::All => "employees.pdf".to_string(),
            PdfExport::Employee(id) => format!("employee_{id}.pdf"),
        }
    }
}

fn employee_path(id: EmployeeId) -> String {
    format!("{EMPLOYEES_PATH}/{id}")
}

impl HttpClient {
    /// All employees, in server order
    pub async fn list_employees(&self) -> ClientResult<Vec<Employee>> {
        let employees: Vec<Employee> = self.get(EMPLOYEES_PATH).await?;
        tracing::debug!(count = employees.len(), "Employees loaded");
        Ok(employees)
    }

    pub async fn get_employee(&self, id: EmployeeId) -> ClientResult<Employee> {
        self.get(&employee_path(id)).await
    }

    /// Creates a record from a draft and returns it with its assigned id
    pub async fn create_employee(&self, draft: &EmployeeDraft) -> ClientResult<Employee> {
        let ack: WriteAck = self.post(EMPLOYEES_PATH, draft).await?;
        let employee = match ack {
            WriteAck::Record(employee) => employee,
            WriteAck::Created { id } => draft.clone().with_id(id),
            WriteAck::Status { status } => {
                return Err(ClientError::InvalidResponse(format!(
                    "create returned no id (status {status:?})"
                )));
            }
        };
        tracing::info!(id = employee.id, "Employee created");
        Ok(employee)
    }

    /// Replaces all fields of an existing record
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> ClientResult<Employee> {
        let ack: WriteAck = self.put(&employee_path(id), draft).await?;
        let employee = match ack {
            WriteAck::Record(employee) if employee.id != id => {
                return Err(ClientError::InvalidResponse(format!(
                    "update of {id} returned record {}",
                    employee.id
                )));
            }
            WriteAck::Record(employee) => employee,
            WriteAck::Created { .. } | WriteAck::Status { .. } => draft.clone().with_id(id),
        };
        tracing::info!(id, "Employee updated");
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> ClientResult<()> {
        let _: serde_json::Value = self.delete(&employee_path(id)).await?;
        tracing::info!(id, "Employee deleted");
        Ok(())
    }

    /// Navigation target of a PDF export
    pub fn pdf_url(&self, export: PdfExport) -> String {
        self.url(&export.path())
    }

    /// Downloads a PDF export to `dest`, returning the number of bytes written
    pub async fn download_pdf(&self, export: PdfExport, dest: &Path) -> ClientResult<usize> {
        let bytes = self.get_bytes(&export.path()).await?;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        tracing::info!(path = %dest.display(), size = bytes.len(), "PDF saved");
        Ok(bytes.len())
    }
}
