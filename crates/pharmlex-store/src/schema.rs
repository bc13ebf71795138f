//! Database schema SQL.
//!
//! One compound row per drug, exactly one canonical name per compound, and
//! N synonym/product rows per compound. Synonym and product text is not
//! globally unique; two compounds may share a historical synonym.

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS compound (
    id TEXT PRIMARY KEY,
    drug_class TEXT NOT NULL DEFAULT '',
    mechanism TEXT NOT NULL DEFAULT '',
    indication TEXT NOT NULL DEFAULT '',
    pharmacodynamics TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS canonical_name (
    id TEXT PRIMARY KEY REFERENCES compound(id),
    display_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS synonym (
    id TEXT NOT NULL REFERENCES canonical_name(id),
    text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS product (
    id TEXT NOT NULL REFERENCES canonical_name(id),
    text TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_synonym_id ON synonym(id);
CREATE INDEX IF NOT EXISTS idx_product_id ON product(id);
"#;
