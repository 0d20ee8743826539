// Remote database schema. One table holds every collection; records are
// stored as JSON documents in their serialized shape.

pub const CREATE_RECORDS: &str = "
    CREATE TABLE IF NOT EXISTS dashboard_records (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body JSONB NOT NULL,
        position BIGSERIAL,
        PRIMARY KEY (collection, id)
    )";

pub const CREATE_POSITION_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS dashboard_records_position
        ON dashboard_records (collection, position)";

/// `pg_notify` channel; the payload is the collection key
pub const CHANGE_CHANNEL: &str = "dashboard_changes";
