//! Migration v1: locations and salary_data

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS locations (
    id TEXT PRIMARY KEY,
    city TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL,
    state_name TEXT NOT NULL,
    slug TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(city, state)
);

CREATE INDEX IF NOT EXISTS idx_locations_slug ON locations(slug);

CREATE TABLE IF NOT EXISTS salary_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    career_keyword TEXT NOT NULL,
    location_id TEXT REFERENCES locations(id),
    year INTEGER NOT NULL,
    hourly_10th REAL,
    hourly_25th REAL,
    hourly_median REAL,
    hourly_75th REAL,
    hourly_90th REAL,
    hourly_mean REAL,
    annual_10th REAL,
    annual_25th REAL,
    annual_median REAL,
    annual_75th REAL,
    annual_90th REAL,
    annual_mean REAL,
    employment_count INTEGER,
    jobs_per_1000 REAL,
    location_quotient REAL,
    mean_error_margin REAL,
    emp_error_margin REAL,
    source TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- NULL location_id (national scope) must collide too, so the key is an expression.
CREATE UNIQUE INDEX IF NOT EXISTS idx_salary_natural_key
    ON salary_data(career_keyword, COALESCE(location_id, ''), year);
";
