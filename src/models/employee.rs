use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    /// Whether a holder of this role may perform an operation requiring `required`.
    pub fn grants(&self, required: Role) -> bool {
        match required {
            Role::Employee => true,
            Role::Admin => *self == Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Human-facing personnel code.
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Employee {
    pub fn new(user_id: Uuid, employee_code: String, first_name: String, last_name: String) -> Self {
        Employee {
            id: Uuid::new_v4(),
            user_id,
            employee_code,
            first_name,
            last_name,
            role: Role::default(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[cfg(test)]
    pub fn apply(&mut self, patch: &EmployeePatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Admin-side partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.role.is_none()
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = String;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            user_id: row.user_id,
            employee_code: row.employee_code,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role.parse()?,
        })
    }
}
