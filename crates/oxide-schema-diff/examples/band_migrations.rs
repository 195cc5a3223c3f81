//! Example: Band Catalogue Migrations
//!
//! This example replays a short migration history for a music catalogue,
//! diffs it against the current model definitions and prints the actions a
//! new migration needs.
//!
//! Run with: cargo run --example band_migrations -p oxide-schema-diff

use oxide_schema_diff::prelude::*;

// =============================================================================
// Migration Definitions
// =============================================================================

/// Initial migration: managers and bands
struct CreateBands;

impl MigrationUnit for CreateBands {
    const ID: &'static str = "2026-01-10T09:00:00";

    fn forwards() -> MigrationManager {
        let mut manager = MigrationManager::new();
        manager
            .add_table("Manager", "manager")
            .add_column("Manager", "manager", "name", "Varchar", params([("length", 50)]))
            .add_table("Band", "band")
            .add_column("Band", "band", "name", "Varchar", params([("length", 50)]))
            .add_column("Band", "band", "genre", "Varchar", params([("length", 20)]));
        manager
    }
}

/// Second migration: band popularity
struct AddPopularity;

impl MigrationUnit for AddPopularity {
    const ID: &'static str = "2026-02-14T16:30:00";

    fn forwards() -> MigrationManager {
        let mut manager = MigrationManager::new();
        manager.add_column(
            "Band",
            "band",
            "popularity",
            "Integer",
            params([("default", 0)]),
        );
        manager
    }
}

// =============================================================================
// Current model definitions
// =============================================================================

fn current_schema() -> Vec<DiffableTable> {
    vec![
        DiffableTable::new("Manager", "manager")
            .column(ColumnDescriptor::new("name", "Varchar").param("length", 100)),
        DiffableTable::new("Act", "act")
            .column(ColumnDescriptor::new("name", "Varchar").param("length", 50))
            .column(ColumnDescriptor::new("genre", "Varchar").param("length", 30))
            .column(ColumnDescriptor::new("popularity", "Integer").param("default", 0)),
        DiffableTable::new("Concert", "concert")
            .column(ColumnDescriptor::new("city", "Varchar").param("length", 100))
            .column(ColumnDescriptor::new("starts", "Timestamp")),
    ]
}

// =============================================================================
// Main: Demonstrate snapshot replay and diffing
// =============================================================================

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("{}", "=".repeat(70));
    println!(" OXIDE-SCHEMA-DIFF: Band Catalogue Example");
    println!("{}", "=".repeat(70));
    println!();

    let history = MigrationHistory::new(vec![
        AddPopularity::to_migration(),
        CreateBands::to_migration(),
    ])?;

    // Show recorded migrations
    println!("[1] Recorded migrations:\n");
    for migration in history.migrations() {
        println!("    - {}", migration.id);
        for line in migration.forwards.render() {
            println!("        {}", line);
        }
    }
    println!();

    // Replay the history
    println!("[2] Replaying history into a snapshot...\n");
    let snapshot = history.snapshot()?;
    for table in &snapshot {
        let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        println!("    {} ({}): {}", table.class_name, table.tablename, columns.join(", "));
    }
    println!();

    // Diff, confirming every rename
    println!("[3] Diffing current models against the snapshot...\n");
    let schema = current_schema();
    let mut confirm = |question: &RenameQuestion| {
        println!("    ? {}", question.prompt());
        println!("    > y");
        Decision::Rename
    };
    let diff = SchemaDiffer::new(&schema, &snapshot).diff(&mut confirm);
    println!();

    println!("[4] Actions for the next migration ({}):", generate_migration_id(chrono::Utc::now()));
    println!("{}", "-".repeat(70));
    for line in diff.render() {
        println!("{}", line);
    }
    println!("{}", "-".repeat(70));
    println!();

    // Replay again with the new migration
    println!("[5] Verifying the new migration reaches the current models...\n");
    let next = Migration::new("2026-03-01T12:00:00", diff.into_manager());
    let mut migrations = history.migrations().to_vec();
    migrations.push(next);
    let history = MigrationHistory::new(migrations)?;
    let remaining = SchemaDiffer::new(&schema, &history.snapshot()?).diff(&mut NoDecision);
    println!("    {} actions remaining", remaining.len());
    println!();

    // Read projections per dialect
    println!("[6] Readable projection for Act:\n");
    let readable = Readable::new("%s (%s)", vec!["name".to_string(), "genre".to_string()]);
    for dialect in Dialect::ALL {
        println!("    {:<8} {}", dialect.name(), readable.select_string(dialect));
    }
    println!();

    println!("{}", "=".repeat(70));
    println!(" Example completed successfully!");
    println!("{}", "=".repeat(70));

    Ok(())
}
