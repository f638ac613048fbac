//! Employee Directory contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the bulk employee snapshot read by the batch runs.
//! - Provide directory maintenance writes used by ingestion and tests.
//!
//! # Invariants
//! - Batch services only ever call `list_employees`.

use super::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use crate::model::employee::Employee;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    e_id,
    e_status,
    e_tdate,
    e_lhold
FROM employees";

/// Read-only view of the employee directory.
pub trait EmployeeDirectory {
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
}

impl<T: EmployeeDirectory + ?Sized> EmployeeDirectory for &T {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        (**self).list_employees()
    }
}

/// SQLite-backed employee directory.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Inserts or fully replaces one employee row.
    pub fn upsert_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (e_id, e_status, e_tdate, e_lhold)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(e_id) DO UPDATE SET
                e_status = excluded.e_status,
                e_tdate = excluded.e_tdate,
                e_lhold = excluded.e_lhold;",
            params![
                employee.e_id.as_str(),
                employee.e_status.as_str(),
                employee.e_tdate.as_deref(),
                bool_to_int(employee.e_lhold),
            ],
        )?;

        Ok(())
    }

    /// Sets the directory-owned legal-hold flag for one employee.
    pub fn set_employee_hold(&self, e_id: &str, e_lhold: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE employees SET e_lhold = ?1 WHERE e_id = ?2;",
            params![bool_to_int(e_lhold), e_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(e_id.to_string()));
        }

        Ok(())
    }

    pub fn get_employee(&self, e_id: &str) -> RepoResult<Option<Employee>> {
        let row = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE e_id = ?1;"),
                [e_id],
                read_raw_employee,
            )
            .optional()?;

        row.map(RawEmployee::into_employee).transpose()
    }
}

impl EmployeeDirectory for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY e_id ASC;"))?;
        let raw_rows = stmt
            .query_map([], read_raw_employee)?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows
            .into_iter()
            .map(RawEmployee::into_employee)
            .collect()
    }
}

struct RawEmployee {
    e_id: String,
    e_status: String,
    e_tdate: Option<String>,
    e_lhold: i64,
}

impl RawEmployee {
    fn into_employee(self) -> RepoResult<Employee> {
        Ok(Employee {
            e_lhold: int_to_bool(self.e_lhold, "employees.e_lhold")?,
            e_id: self.e_id,
            e_status: self.e_status,
            e_tdate: self.e_tdate,
        })
    }
}

fn read_raw_employee(row: &Row<'_>) -> rusqlite::Result<RawEmployee> {
    Ok(RawEmployee {
        e_id: row.get("e_id")?,
        e_status: row.get("e_status")?,
        e_tdate: row.get("e_tdate")?,
        e_lhold: row.get("e_lhold")?,
    })
}
