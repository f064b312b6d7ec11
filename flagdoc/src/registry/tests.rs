//! Tests for flag registration and path lookup.

use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::*;

struct Ring {
    heartbeat_period: Duration,
    replication_factor: u32,
}

impl Ring {
    fn register_flags_with_prefix(
        &self,
        prefix: &str,
        flags: &mut FlagSet<'_>,
    ) -> Result<(), FlagdocError> {
        flags.add(
            "heartbeat_period",
            Flag::new(
                format!("{prefix}ring.heartbeat-period"),
                &self.heartbeat_period,
                "Period at which to heartbeat to the ring.",
            ),
        )?;
        flags.add(
            "replication_factor",
            Flag::new(
                format!("{prefix}ring.replication-factor"),
                &self.replication_factor,
                "Number of replicas per stream.",
            )
            .advanced(),
        )
    }
}

struct Stack {
    distributor: Ring,
    ingester: Ring,
}

impl RegisterFlags for Stack {
    fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        self.distributor
            .register_flags_with_prefix("distributor.", &mut flags.nested("distributor"))?;
        self.ingester
            .register_flags_with_prefix("ingester.", &mut flags.nested("ingester"))
    }
}

fn stack() -> Stack {
    let ring = || Ring {
        heartbeat_period: Duration::from_secs(5),
        replication_factor: 3,
    };
    Stack {
        distributor: ring(),
        ingester: ring(),
    }
}

/// Registers whatever the closure registers, scoped at the root.
struct Adhoc<F>(F);

impl<F> RegisterFlags for Adhoc<F>
where
    F: Fn(&mut FlagSet<'_>) -> Result<(), FlagdocError>,
{
    fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
        (self.0)(flags)
    }
}

#[rstest]
fn nested_sets_bind_flags_to_structural_paths() -> Result<()> {
    let registry = FlagRegistry::from_config(&stack())?;
    ensure!(registry.len() == 4, "expected four flags, got {}", registry.len());

    let path = FieldPath::from(["ingester", "heartbeat_period"]);
    let flag = registry
        .lookup(&path)
        .ok_or_else(|| anyhow!("no flag bound to {path}"))?;
    ensure!(
        flag.name == "ingester.ring.heartbeat-period",
        "unexpected flag {}",
        flag.name
    );
    ensure!(flag.default == "5s", "unexpected default {}", flag.default);
    ensure!(
        registry.path_of("distributor.ring.replication-factor")
            == Some(&FieldPath::from(["distributor", "replication_factor"])),
        "reverse lookup by name failed"
    );
    Ok(())
}

#[rstest]
fn categories_declared_at_registration_are_kept() -> Result<()> {
    let registry = FlagRegistry::from_config(&stack())?;
    let flag = registry
        .lookup(&FieldPath::from(["distributor", "replication_factor"]))
        .ok_or_else(|| anyhow!("replication factor flag missing"))?;
    ensure!(
        flag.category == Some(FieldCategory::Advanced),
        "category lost: {:?}",
        flag.category
    );
    Ok(())
}

#[rstest]
fn redefining_a_flag_name_is_fatal() -> Result<()> {
    let config = Adhoc(|flags: &mut FlagSet<'_>| {
        flags.add("first", Flag::new("shared.name", &1_u8, "First."))?;
        flags.add("second", Flag::new("shared.name", &2_u8, "Second."))
    });
    let err = FlagRegistry::from_config(&config)
        .err()
        .ok_or_else(|| anyhow!("expected a redefinition error"))?;
    ensure!(
        err == FlagdocError::FlagRedefined {
            name: "shared.name".to_owned(),
            first: "first".to_owned(),
            second: "second".to_owned(),
        },
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::dashes("--port")]
#[case::whitespace("server port")]
fn malformed_flag_names_are_rejected(#[case] name: &'static str) -> Result<()> {
    let config = Adhoc(move |flags: &mut FlagSet<'_>| {
        flags.add("port", Flag::new(name, &8080_u16, "Port."))
    });
    let err = FlagRegistry::from_config(&config)
        .err()
        .ok_or_else(|| anyhow!("expected {name:?} to be rejected"))?;
    ensure!(
        matches!(err, FlagdocError::InvalidFlagName { .. }),
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
fn second_flag_on_the_same_field_is_ignored() -> Result<()> {
    let config = Adhoc(|flags: &mut FlagSet<'_>| {
        flags.add("port", Flag::new("server.port", &8080_u16, "Port."))?;
        flags.add("port", Flag::new("server.legacy-port", &8080_u16, "Legacy port."))
    });
    let registry = FlagRegistry::from_config(&config)?;
    let flag = registry
        .lookup(&FieldPath::from(["port"]))
        .ok_or_else(|| anyhow!("port flag missing"))?;
    ensure!(flag.name == "server.port", "first registration should win");
    ensure!(registry.len() == 1, "duplicate path should not add an entry");
    Ok(())
}

#[rstest]
#[case::zero(Duration::ZERO, "0s")]
#[case::millis(Duration::from_millis(500), "500ms")]
#[case::micros(Duration::from_micros(250), "250µs")]
#[case::seconds(Duration::from_secs(15), "15s")]
#[case::minutes(Duration::from_secs(90), "1m30s")]
#[case::hours(Duration::from_secs(3600), "1h0m0s")]
#[case::fractional(Duration::from_millis(1500), "1.5s")]
fn durations_render_in_flag_notation(#[case] duration: Duration, #[case] expected: &str) -> Result<()> {
    let rendered = format_duration(duration);
    ensure!(rendered == expected, "expected {expected}, got {rendered}");
    Ok(())
}

#[rstest]
fn collection_defaults_are_comma_joined() -> Result<()> {
    let values = vec!["all".to_owned(), "ruler".to_owned()];
    ensure!(values.flag_default() == "all,ruler", "list default mismatch");
    let missing: Option<u16> = None;
    ensure!(missing.flag_default().is_empty(), "absent option should render empty");
    Ok(())
}

#[rstest]
fn paths_display_with_dots() -> Result<()> {
    let path = FieldPath::root().child("ingester").child("lifecycler");
    ensure!(path.to_string() == "ingester.lifecycler", "got {path}");
    ensure!(FieldPath::root().to_string() == "(root)", "root display changed");
    ensure!(
        path.child("ring").starts_with(&path),
        "child should lie beneath its parent"
    );
    Ok(())
}
