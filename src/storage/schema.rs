//! Logical schema description and dialect translation
//!
//! The four tables are described once, in terms of logical column types, and
//! translated to backend DDL at initialization time. Schema creation is
//! idempotent (`CREATE TABLE IF NOT EXISTS`) so both backends can run it on
//! every startup.

use std::fmt::Write;

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Logical column type, mapped per dialect
///
/// `Numeric` columns hold fixed-precision values (2 decimal digits); the
/// precision is enforced by the persistence layer before writes, so the
/// physical column may be floating-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Text,
    Integer,
    Numeric,
    Timestamp,
}

impl LogicalType {
    fn sql(self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (LogicalType::Text, _) => "TEXT",
            (LogicalType::Integer, _) => "INTEGER",
            (LogicalType::Numeric, Dialect::Postgres) => "DOUBLE PRECISION",
            (LogicalType::Numeric, Dialect::Sqlite) => "REAL",
            (LogicalType::Timestamp, Dialect::Postgres) => "TIMESTAMPTZ",
            (LogicalType::Timestamp, Dialect::Sqlite) => "TEXT",
        }
    }
}

/// Column description
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: LogicalType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    /// Referenced table; owned rows cascade on owner deletion.
    pub references: Option<&'static str>,
}

impl ColumnDef {
    const fn new(name: &'static str, ty: LogicalType) -> Self {
        Self {
            name,
            ty,
            not_null: false,
            unique: false,
            primary_key: false,
            references: None,
        }
    }

    const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }
}

/// Table description
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    /// Columns to index together (beyond primary key and unique constraints).
    pub index: Option<&'static [&'static str]>,
}

const ID: ColumnDef = ColumnDef::new("id", LogicalType::Text).primary_key();
const OWNER: ColumnDef = ColumnDef::new("user_id", LogicalType::Text)
    .not_null()
    .references("users");
const CREATED_AT: ColumnDef = ColumnDef::new("created_at", LogicalType::Timestamp).not_null();

pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &[
        ID,
        ColumnDef::new("username", LogicalType::Text).not_null().unique(),
        ColumnDef::new("email", LogicalType::Text).not_null().unique(),
        ColumnDef::new("password", LogicalType::Text).not_null(),
        ColumnDef::new("full_name", LogicalType::Text),
        ColumnDef::new("age", LogicalType::Integer),
        ColumnDef::new("gender", LogicalType::Text),
        ColumnDef::new("current_weight", LogicalType::Numeric),
        ColumnDef::new("target_weight", LogicalType::Numeric),
        ColumnDef::new("primary_goal", LogicalType::Text),
        ColumnDef::new("activity_level", LogicalType::Text),
        ColumnDef::new("weekly_workout_goal", LogicalType::Text),
        CREATED_AT,
    ],
    index: None,
};

pub const WORKOUTS: TableDef = TableDef {
    name: "workouts",
    columns: &[
        ID,
        OWNER,
        ColumnDef::new("workout_type", LogicalType::Text).not_null(),
        ColumnDef::new("duration", LogicalType::Integer).not_null(),
        ColumnDef::new("calories_burned", LogicalType::Integer),
        ColumnDef::new("intensity", LogicalType::Text),
        ColumnDef::new("exercise_details", LogicalType::Text),
        ColumnDef::new("feeling", LogicalType::Text),
        CREATED_AT,
    ],
    index: Some(&["user_id", "created_at"]),
};

pub const FOOD_LOGS: TableDef = TableDef {
    name: "food_logs",
    columns: &[
        ID,
        OWNER,
        ColumnDef::new("food_name", LogicalType::Text).not_null(),
        ColumnDef::new("serving_size", LogicalType::Text),
        ColumnDef::new("calories", LogicalType::Integer).not_null(),
        ColumnDef::new("protein", LogicalType::Numeric),
        ColumnDef::new("carbs", LogicalType::Numeric),
        ColumnDef::new("fats", LogicalType::Numeric),
        ColumnDef::new("meal_type", LogicalType::Text).not_null(),
        CREATED_AT,
    ],
    index: Some(&["user_id", "created_at"]),
};

pub const WEIGHT_ENTRIES: TableDef = TableDef {
    name: "weight_entries",
    columns: &[
        ID,
        OWNER,
        ColumnDef::new("weight", LogicalType::Numeric).not_null(),
        ColumnDef::new("notes", LogicalType::Text),
        CREATED_AT,
    ],
    index: Some(&["user_id", "created_at"]),
};

/// All tables in creation order (referenced tables first).
pub const TABLES: &[TableDef] = &[USERS, WORKOUTS, FOOD_LOGS, WEIGHT_ENTRIES];

/// Render the `CREATE TABLE IF NOT EXISTS` statement for one table.
pub fn create_table_sql(table: &TableDef, dialect: Dialect) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (", table.name);
    for (i, col) in table.columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{} {}", col.name, col.ty.sql(dialect));
        if col.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if col.not_null {
            sql.push_str(" NOT NULL");
        }
        if col.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(referenced) = col.references {
            let _ = write!(sql, " REFERENCES {}(id) ON DELETE CASCADE", referenced);
        }
    }
    sql.push(')');
    sql
}

/// Render the `CREATE INDEX IF NOT EXISTS` statement for a table, if any.
pub fn create_index_sql(table: &TableDef) -> Option<String> {
    let columns = table.index?;
    Some(format!(
        "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({})",
        table.name,
        columns.join("_"),
        table.name,
        columns.join(", ")
    ))
}
