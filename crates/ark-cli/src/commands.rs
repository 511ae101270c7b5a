use std::collections::BTreeSet;

use anyhow::{anyhow, bail};
use colored::Colorize;

use ark_reconcile::{
    link_missing_record, remove_unassigned, select_replacement, LinkOutcome, Reconciler,
    ReconciliationReport, RemovalOutcome,
};
use ark_store::LocalFileStore;
use ark_types::{AppId, AssetId, Catalog, CreatedAt, OwnerId, VariantId};

use crate::cli::{Cli, Command, DecodeArgs, EncodeArgs, OutputFormat, PruneArgs, RelinkArgs};
use crate::records::JsonRecordStore;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let catalog = Catalog::standard();
    match &cli.command {
        Command::Audit(_) => cmd_audit(&cli, &catalog),
        Command::Decode(args) => cmd_decode(&cli, &catalog, args),
        Command::Encode(args) => cmd_encode(&cli, args),
        Command::Relink(args) => cmd_relink(&cli, &catalog, args),
        Command::Prune(args) => cmd_prune(&cli, &catalog, args),
    }
}

fn run_audit(cli: &Cli, catalog: &Catalog) -> anyhow::Result<ReconciliationReport> {
    let files = LocalFileStore::new(&cli.root);
    let records = JsonRecordStore::new(&cli.records);
    Ok(Reconciler::new(&records, &files, &catalog.variants).run()?)
}

fn cmd_audit(cli: &Cli, catalog: &Catalog) -> anyhow::Result<()> {
    let report = run_audit(cli, catalog)?;
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            print!("{}", report.render(catalog));
            if report.is_clean() {
                println!("{} records and storage agree", "✓".green().bold());
            }
        }
    }
    Ok(())
}

fn cmd_decode(cli: &Cli, catalog: &Catalog, args: &DecodeArgs) -> anyhow::Result<()> {
    let id = ark_codec::decode(&args.token)?;
    let app_name = catalog.apps.name(id.app).unwrap_or("unknown");
    let variant_name = catalog
        .variants
        .spec(id.variant)
        .map(|spec| spec.name.as_str())
        .unwrap_or("unknown");

    match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "token": args.token,
                "app": id.app.get(),
                "app_name": app_name,
                "variant": id.variant.get(),
                "variant_name": variant_name,
                "created_at": id.created_at.as_secs(),
                "created_at_utc": id.created_at.to_string(),
                "owner": id.owner.get(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("Token {}", args.token.bold());
            println!("  Application: {} ({})", app_name.cyan(), id.app);
            println!("  Variant: {} ({})", variant_name.cyan(), id.variant);
            println!("  Created: {}", id.created_at.to_string().yellow());
            println!("  Owner: {}", id.owner.to_string().bold());
        }
    }
    Ok(())
}

fn cmd_encode(cli: &Cli, args: &EncodeArgs) -> anyhow::Result<()> {
    let created_at = match args.created_at {
        Some(secs) => CreatedAt::new(secs)?,
        None => CreatedAt::now(),
    };
    let id = AssetId::new(
        AppId::new(args.app)?,
        VariantId::new(args.variant)?,
        created_at,
        OwnerId::new(args.owner)?,
    );
    let token = ark_codec::encode(&id)?;

    match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "token": token,
                "created_at": id.created_at.as_secs(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => println!("{token}"),
    }
    Ok(())
}

fn cmd_relink(cli: &Cli, catalog: &Catalog, args: &RelinkArgs) -> anyhow::Result<()> {
    let report = run_audit(cli, catalog)?;
    let primary = catalog
        .variants
        .primary()
        .ok_or_else(|| anyhow!("catalog has no variants"))?;
    let audit = report
        .variant(primary.id)
        .ok_or_else(|| anyhow!("no audit for primary variant {}", primary.name))?;

    let records = JsonRecordStore::new(&cli.records);
    let mut outcomes = Vec::new();
    for &owner_raw in audit.missing.keys() {
        // Owners in the report already passed validation during the audit.
        let Ok(owner) = OwnerId::new(owner_raw) else {
            continue;
        };
        let outcome = if args.dry_run {
            match select_replacement(owner, &audit.unassigned) {
                Some((name, _)) => LinkOutcome::Linked {
                    owner: owner_raw,
                    name,
                },
                None => LinkOutcome::NoCandidate { owner: owner_raw },
            }
        } else {
            link_missing_record(&records, owner, primary.id, &audit.unassigned)?
        };
        outcomes.push(outcome);
    }

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Text => {
            if args.dry_run {
                println!("Dry run — the record store was not written.");
            }
            if outcomes.is_empty() {
                println!(
                    "{} no records are missing their {} file",
                    "✓".green().bold(),
                    primary.name
                );
            }
            for outcome in &outcomes {
                match outcome {
                    LinkOutcome::Linked { owner, name } => {
                        println!("{} owner {} → {}", "✓".green(), owner, name.bold());
                    }
                    LinkOutcome::NoCandidate { owner } => {
                        println!(
                            "{} owner {}: no candidate; issue a default object instead",
                            "-".yellow(),
                            owner
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn cmd_prune(cli: &Cli, catalog: &Catalog, args: &PruneArgs) -> anyhow::Result<()> {
    if !args.all && args.names.is_empty() {
        bail!("nothing to prune: pass file names or --all");
    }

    let report = run_audit(cli, catalog)?;
    let files = LocalFileStore::new(&cli.root);

    let mut results: Vec<(String, RemovalOutcome)> = Vec::new();
    let mut matched: BTreeSet<String> = BTreeSet::new();
    for spec in catalog.variants.iter() {
        let Some(audit) = report.variant(spec.id) else {
            continue;
        };
        let targets: Vec<String> = if args.all {
            audit.unassigned.iter().cloned().collect()
        } else {
            // Only names the audit actually classed unassigned are touched.
            args.names
                .iter()
                .filter(|name| audit.unassigned.contains(*name))
                .cloned()
                .collect()
        };
        matched.extend(targets.iter().cloned());
        if targets.is_empty() {
            continue;
        }
        let outcome = remove_unassigned(&files, &spec.location, &targets, args.dry_run);
        results.push((spec.name.clone(), outcome));
    }

    let ignored: Vec<&String> = args
        .names
        .iter()
        .filter(|name| !matched.contains(*name))
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "variants": results
                    .iter()
                    .map(|(name, outcome)| (name.clone(), outcome))
                    .collect::<std::collections::BTreeMap<_, _>>(),
                "ignored": ignored,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if results.is_empty() {
                println!("{} nothing unassigned to remove", "✓".green().bold());
            }
            for (variant, outcome) in &results {
                println!("Variant {variant}:");
                print!("{}", outcome.render());
            }
            for name in &ignored {
                println!("- ignored {name}: not an unassigned file");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    use ark_reconcile::AssetRecord;
    use clap::Parser;

    fn vid(value: u8) -> VariantId {
        VariantId::new(value).unwrap()
    }

    /// A workspace with both variant locations and a records file.
    fn workspace(rows: &[AssetRecord]) -> (tempfile::TempDir, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("storage");
        fs::create_dir_all(root.join("master")).unwrap();
        fs::create_dir_all(root.join("thumbnail")).unwrap();
        let records = dir.path().join("records.json");
        fs::write(&records, serde_json::to_string(rows).unwrap()).unwrap();
        let root = root.to_string_lossy().to_string();
        let records = records.to_string_lossy().to_string();
        (dir, root, records)
    }

    fn cli_for(root: &str, records: &str, tail: &[&str]) -> Cli {
        let mut argv = vec!["ark", "--root", root, "--records", records];
        argv.extend_from_slice(tail);
        Cli::try_parse_from(argv).unwrap()
    }

    fn token(created_at: u64, owner: u64) -> String {
        ark_codec::encode(&AssetId::from_parts(1, 0, created_at, owner).unwrap())
            .unwrap()
            .into_string()
    }

    #[test]
    fn audit_sees_the_fixture_divergences() {
        let tok_a = token(1_700_000_000, 1);
        let rows = vec![
            AssetRecord::new(1).with_file(vid(0), &tok_a),
            AssetRecord::new(2).with_absent(vid(0)),
        ];
        let (dir, root, records) = workspace(&rows);
        fs::write(dir.path().join("storage/master").join(&tok_a), b"x").unwrap();
        let orphan = token(1_600_000_000, 2);
        fs::write(dir.path().join("storage/master").join(&orphan), b"x").unwrap();

        let cli = cli_for(&root, &records, &["audit"]);
        let catalog = Catalog::standard();
        let report = run_audit(&cli, &catalog).unwrap();

        let master = report.variant(vid(0)).unwrap();
        assert_eq!(master.consistent, 1);
        assert_eq!(master.missing.len(), 1);
        assert!(master.unassigned.contains(&orphan));
    }

    #[test]
    fn relink_assigns_the_newest_orphan() {
        let rows = vec![AssetRecord::new(2).with_absent(vid(0))];
        let (dir, root, records) = workspace(&rows);
        let older = token(1_600_000_000, 2);
        let newer = token(1_700_000_000, 2);
        for name in [&older, &newer] {
            fs::write(dir.path().join("storage/master").join(name), b"x").unwrap();
        }

        let cli = cli_for(&root, &records, &["relink"]);
        let catalog = Catalog::standard();
        cmd_relink(&cli, &catalog, &RelinkArgs { dry_run: false }).unwrap();

        let store = JsonRecordStore::new(&records);
        let rows = ark_reconcile::RecordStore::load(&store).unwrap();
        assert_eq!(rows[0].field(vid(0)).as_assigned(), Some(newer.as_str()));
    }

    #[test]
    fn relink_dry_run_leaves_records_untouched() {
        let rows = vec![AssetRecord::new(2).with_absent(vid(0))];
        let (dir, root, records) = workspace(&rows);
        let orphan = token(1_700_000_000, 2);
        fs::write(dir.path().join("storage/master").join(&orphan), b"x").unwrap();

        let cli = cli_for(&root, &records, &["relink", "--dry-run"]);
        let catalog = Catalog::standard();
        cmd_relink(&cli, &catalog, &RelinkArgs { dry_run: true }).unwrap();

        let store = JsonRecordStore::new(&records);
        let rows = ark_reconcile::RecordStore::load(&store).unwrap();
        assert!(rows[0].field(vid(0)).is_absent());
    }

    #[test]
    fn prune_only_touches_unassigned_names() {
        let tok_owned = token(1_700_000_000, 1);
        let rows = vec![AssetRecord::new(1).with_file(vid(0), &tok_owned)];
        let (dir, root, records) = workspace(&rows);
        let orphan = token(1_600_000_000, 9);
        for name in [&tok_owned, &orphan] {
            fs::write(dir.path().join("storage/master").join(name), b"x").unwrap();
        }

        // Ask to prune both; only the orphan may go.
        let cli = cli_for(&root, &records, &["prune", tok_owned.as_str(), orphan.as_str()]);
        let catalog = Catalog::standard();
        cmd_prune(
            &cli,
            &catalog,
            &PruneArgs {
                names: vec![tok_owned.clone(), orphan.clone()],
                all: false,
                dry_run: false,
            },
        )
        .unwrap();

        assert!(dir.path().join("storage/master").join(&tok_owned).exists());
        assert!(!dir.path().join("storage/master").join(&orphan).exists());
    }

    #[test]
    fn prune_without_names_or_all_fails() {
        let (_dir, root, records) = workspace(&[]);
        let cli = cli_for(&root, &records, &["prune"]);
        let catalog = Catalog::standard();
        let err = cmd_prune(
            &cli,
            &catalog,
            &PruneArgs {
                names: Vec::new(),
                all: false,
                dry_run: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("nothing to prune"));
    }

    #[test]
    fn prune_all_dry_run_previews_every_orphan() {
        let (dir, root, records) = workspace(&[]);
        let orphan_master = token(1_600_000_000, 3);
        let thumb = ark_codec::encode(&AssetId::from_parts(1, 1, 1_600_000_000, 3).unwrap())
            .unwrap()
            .into_string();
        fs::write(dir.path().join("storage/master").join(&orphan_master), b"x").unwrap();
        fs::write(dir.path().join("storage/thumbnail").join(&thumb), b"x").unwrap();

        let cli = cli_for(&root, &records, &["prune", "--all", "--dry-run"]);
        let catalog = Catalog::standard();
        cmd_prune(
            &cli,
            &catalog,
            &PruneArgs {
                names: Vec::new(),
                all: true,
                dry_run: true,
            },
        )
        .unwrap();

        // Dry run: both orphans still on disk.
        assert!(dir.path().join("storage/master").join(&orphan_master).exists());
        assert!(dir.path().join("storage/thumbnail").join(&thumb).exists());
    }

    #[test]
    fn records_map_keys_serialize_for_fixtures() {
        // The fixture format the CLI documents: owner plus per-variant map.
        let record = AssetRecord {
            owner: Some(5),
            files: BTreeMap::from([(vid(0), ark_reconcile::FileField::Absent)]),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: AssetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
