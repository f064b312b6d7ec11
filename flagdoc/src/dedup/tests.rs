//! Tests for duplicate block annotation and flag rewriting.

use anyhow::{Context, Result, ensure};
use rstest::{fixture, rstest};

use super::*;
use crate::schema::FieldCategory;
use crate::tree::{BlockEntry, FieldEntry};

fn field(name: &str, flag: &str) -> ConfigEntry {
    ConfigEntry::Field(FieldEntry {
        name: name.to_owned(),
        flag: flag.to_owned(),
        field_type: "string".to_owned(),
        default: None,
        description: String::new(),
        required: false,
        category: FieldCategory::Basic,
    })
}

fn block_entry(name: &str, block: BlockId, root: bool) -> ConfigEntry {
    ConfigEntry::Block(BlockEntry {
        name: name.to_owned(),
        block,
        root,
        required: false,
        description: String::new(),
    })
}

fn add_root(doc: &mut ConfigDoc, name: &str, entries: Vec<ConfigEntry>) -> BlockId {
    let mut block = ConfigBlock::new(name, "", true);
    block.entries = entries;
    let id = doc.add_block(block);
    doc.add_top_level(id);
    id
}

fn add_nested(doc: &mut ConfigDoc, name: &str, entries: Vec<ConfigEntry>) -> BlockId {
    let mut block = ConfigBlock::new(name, "", false);
    block.entries = entries;
    doc.add_block(block)
}

fn add_ring(doc: &mut ConfigDoc, prefix: &str) -> BlockId {
    let kvstore = add_nested(
        doc,
        "kvstore",
        vec![field("store", &format!("{prefix}ring.store"))],
    );
    add_root(
        doc,
        "ring",
        vec![
            field("heartbeat_period", &format!("{prefix}ring.heartbeat-period")),
            block_entry("kvstore", kvstore, false),
            field("heartbeat_timeout", &format!("{prefix}ring.heartbeat-timeout")),
        ],
    )
}

struct TwoRings {
    doc: ConfigDoc,
    distributor: BlockId,
    distributor_ring: BlockId,
    ingester_ring: BlockId,
}

#[fixture]
fn two_rings() -> TwoRings {
    let mut doc = ConfigDoc::new();
    add_root(&mut doc, "", Vec::new());
    let distributor = add_root(
        &mut doc,
        "distributor",
        vec![field("shard_by_all_labels", "distributor.shard-by-all-labels")],
    );
    let distributor_ring = add_ring(&mut doc, "distributor.");
    let ingester_ring = add_ring(&mut doc, "ingester.");
    TwoRings {
        doc,
        distributor,
        distributor_ring,
        ingester_ring,
    }
}

fn flags_of(doc: &ConfigDoc, id: BlockId) -> Vec<String> {
    let mut flags = Vec::new();
    collect_flags(doc, id, &mut flags);
    flags
}

fn collect_flags(doc: &ConfigDoc, id: BlockId, flags: &mut Vec<String>) {
    let Some(block) = doc.block(id) else {
        return;
    };
    for entry in &block.entries {
        match entry {
            ConfigEntry::Field(leaf) => flags.push(leaf.flag.clone()),
            ConfigEntry::Block(child) => collect_flags(doc, child.block, flags),
        }
    }
}

#[rstest]
fn duplicated_rings_share_a_placeholder(two_rings: TwoRings) -> Result<()> {
    let TwoRings {
        mut doc,
        distributor_ring,
        ingester_ring,
        ..
    } = two_rings;
    let summary = annotate_flag_prefix(&mut doc);

    for (id, prefix) in [(distributor_ring, "distributor."), (ingester_ring, "ingester.")] {
        let ring = doc.block(id).context("ring block missing")?;
        ensure!(ring.flags_prefix == prefix, "got prefix {:?}", ring.flags_prefix);
        ensure!(
            ring.flags_prefixes == ["distributor.", "ingester."],
            "unexpected sibling prefixes {:?}",
            ring.flags_prefixes
        );
        let flags = flags_of(&doc, id);
        ensure!(
            flags
                == [
                    "<prefix>.ring.heartbeat-period",
                    "<prefix>.ring.store",
                    "<prefix>.ring.heartbeat-timeout",
                ],
            "unexpected rewritten flags {flags:?}"
        );
    }
    ensure!(
        summary
            == DedupSummary {
                duplicate_groups: 1,
                prefixed_blocks: 2,
                rewritten_flags: 6,
            },
        "unexpected summary {summary:?}"
    );
    Ok(())
}

#[rstest]
fn restoring_rewritten_flags_reproduces_the_originals(two_rings: TwoRings) -> Result<()> {
    let TwoRings {
        mut doc,
        distributor_ring,
        ingester_ring,
        ..
    } = two_rings;
    let originals: Vec<Vec<String>> = [distributor_ring, ingester_ring]
        .iter()
        .map(|&id| flags_of(&doc, id))
        .collect();
    annotate_flag_prefix(&mut doc);

    for (&id, original) in [distributor_ring, ingester_ring].iter().zip(&originals) {
        let prefix = &doc.block(id).context("ring block missing")?.flags_prefix;
        let restored: Vec<String> = flags_of(&doc, id)
            .iter()
            .map(|flag| restore_flag(flag, prefix))
            .collect();
        ensure!(&restored == original, "restored {restored:?}, expected {original:?}");
    }
    Ok(())
}

#[rstest]
fn singleton_blocks_are_untouched(two_rings: TwoRings) -> Result<()> {
    let TwoRings {
        mut doc,
        distributor,
        ..
    } = two_rings;
    annotate_flag_prefix(&mut doc);
    let block = doc.block(distributor).context("distributor missing")?;
    ensure!(block.flags_prefix.is_empty(), "singleton received a prefix");
    ensure!(block.flags_prefixes.is_empty(), "singleton received sibling prefixes");
    ensure!(
        flags_of(&doc, distributor) == ["distributor.shard-by-all-labels"],
        "singleton flags were rewritten"
    );
    Ok(())
}

#[rstest]
fn a_second_pass_changes_nothing(two_rings: TwoRings) -> Result<()> {
    let mut doc = two_rings.doc;
    annotate_flag_prefix(&mut doc);
    let first = doc.clone();
    let summary = annotate_flag_prefix(&mut doc);
    ensure!(doc == first, "second pass modified the tree");
    ensure!(summary.prefixed_blocks == 0, "second pass assigned prefixes");
    ensure!(summary.rewritten_flags == 0, "second pass rewrote flags");
    Ok(())
}

#[rstest]
fn colliding_instances_are_left_unrewritten() -> Result<()> {
    let mut doc = ConfigDoc::new();
    let first = add_ring(&mut doc, "distributor.");
    let second = add_ring(&mut doc, "ingester.");
    let third = add_ring(&mut doc, "distributor.");
    annotate_flag_prefix(&mut doc);

    for id in [first, third] {
        let ring = doc.block(id).context("ring missing")?;
        ensure!(ring.flags_prefix.is_empty(), "colliding instance got a prefix");
        ensure!(
            flags_of(&doc, id).iter().all(|flag| flag.starts_with("distributor.")),
            "colliding instance was rewritten"
        );
    }
    let ring = doc.block(second).context("ring missing")?;
    ensure!(ring.flags_prefix == "ingester.", "got {:?}", ring.flags_prefix);
    ensure!(ring.flags_prefixes == ["ingester."], "got {:?}", ring.flags_prefixes);

    let again = doc.clone();
    annotate_flag_prefix(&mut doc);
    ensure!(doc == again, "partially rewritten group changed on a second pass");
    Ok(())
}

#[rstest]
fn nested_root_blocks_keep_their_flags() -> Result<()> {
    let mut doc = ConfigDoc::new();
    let consul = add_root(
        &mut doc,
        "consul",
        vec![field("host", "distributor.ring.consul.hostname")],
    );
    let first = add_root(
        &mut doc,
        "ring",
        vec![
            field("store", "distributor.ring.store"),
            block_entry("consul", consul, true),
        ],
    );
    let second = add_root(&mut doc, "ring", vec![field("store", "ingester.ring.store")]);
    annotate_flag_prefix(&mut doc);

    ensure!(
        flags_of(&doc, consul) == ["distributor.ring.consul.hostname"],
        "nested root block was rewritten by its parent"
    );
    ensure!(
        flags_of(&doc, first) == ["<prefix>.ring.store", "distributor.ring.consul.hostname"],
        "parent flags should be rewritten around the nested root"
    );
    ensure!(
        flags_of(&doc, second) == ["<prefix>.ring.store"],
        "sibling instance should be rewritten"
    );
    Ok(())
}

#[rstest]
fn flags_without_the_prefix_are_left_alone() -> Result<()> {
    let mut doc = ConfigDoc::new();
    let first = add_root(
        &mut doc,
        "grpc_client",
        vec![
            field("max_recv_msg_size", "ingester.client.grpc-max-recv-msg-size"),
            field("backoff", "shared.backoff"),
            field("yaml_only", ""),
        ],
    );
    add_root(
        &mut doc,
        "grpc_client",
        vec![field("max_recv_msg_size", "querier.client.grpc-max-recv-msg-size")],
    );
    annotate_flag_prefix(&mut doc);
    ensure!(
        flags_of(&doc, first) == ["<prefix>.client.grpc-max-recv-msg-size", "shared.backoff", ""],
        "unexpected flags {:?}",
        flags_of(&doc, first)
    );
    Ok(())
}

#[rstest]
fn instances_without_a_representative_get_no_prefix() -> Result<()> {
    let mut doc = ConfigDoc::new();
    let first = add_root(&mut doc, "ring", vec![field("store", "distributor.ring.store")]);
    let unbound = add_root(&mut doc, "ring", vec![field("store", "")]);
    let third = add_root(&mut doc, "ring", vec![field("store", "ingester.ring.store")]);
    annotate_flag_prefix(&mut doc);

    let prefixes: Vec<&str> = [first, unbound, third]
        .iter()
        .filter_map(|&id| doc.block(id))
        .map(|block| block.flags_prefix.as_str())
        .collect();
    ensure!(
        prefixes == ["distributor.", "", "ingester."],
        "prefixes misaligned with their instances: {prefixes:?}"
    );
    let block = doc.block(unbound).context("unbound ring missing")?;
    ensure!(
        block.flags_prefixes == ["distributor.", "ingester."],
        "every instance should list the group's prefixes"
    );
    Ok(())
}

#[rstest]
fn groups_without_a_shared_stem_are_left_unmodified() -> Result<()> {
    let mut doc = ConfigDoc::new();
    add_root(&mut doc, "server", vec![field("http_port", "server.http-port")]);
    add_root(&mut doc, "server", vec![field("grpc_port", "server.grpc-port")]);
    let before = doc.clone();
    let summary = annotate_flag_prefix(&mut doc);

    ensure!(doc == before, "group without a shared stem was modified");
    ensure!(
        summary
            == DedupSummary {
                duplicate_groups: 1,
                prefixed_blocks: 0,
                rewritten_flags: 0,
            },
        "unexpected summary {summary:?}"
    );
    Ok(())
}

#[rstest]
#[case::rewritten("<prefix>.ring.store", "ingester.", "ingester.ring.store")]
#[case::untouched("shared.backoff", "ingester.", "shared.backoff")]
#[case::empty("", "ingester.", "")]
fn restore_flag_inverts_rewriting(
    #[case] flag: &str,
    #[case] prefix: &str,
    #[case] expected: &str,
) -> Result<()> {
    let restored = restore_flag(flag, prefix);
    ensure!(restored == expected, "expected {expected}, got {restored}");
    Ok(())
}
