use insta::assert_json_snapshot;
use serde_json::json;
use yare::parameterized;

use super::{edge_triples, realm_entries, realm_entries_with_clashing_sid};
use crate::config::{IngestConfig, OutputFormat};
use crate::context::RunWarning;
use crate::pipeline::{Pipeline, RunOutput};
use crate::realm::SidConfidence;
use crate::types::{DirectoryEntry, EntityKind, GraphOutput};

const SID: &str = "S-1-5-21-1000-2000-3000";

fn run(format: OutputFormat) -> RunOutput {
    Pipeline::new(IngestConfig::new("example.com").with_format(format))
        .run(&realm_entries())
        .unwrap()
}

#[test]
fn test_realm_is_authoritative() {
    let output = run(OutputFormat::Unified);
    assert_eq!(output.context.realm.sid, SID);
    assert_eq!(output.context.realm.confidence, SidConfidence::Authoritative);
    assert!(output.context.warnings.is_empty());
    assert_eq!(output.context.entry_count, 19);
}

#[test]
fn test_unified_stats() {
    let output = run(OutputFormat::Unified);
    assert_json_snapshot!(output.context.stats, @r#"
    {
      "entities": {
        "Domain": 1,
        "User": 3,
        "Computer": 2,
        "Group": 3,
        "HBACService": 2,
        "HBACServiceGroup": 1
      },
      "membership_rules": 3,
      "hbac_rules": 2,
      "sudoer_rules": 2,
      "unrecognized_entries": 1,
      "disabled_hbac_rules": 1,
      "duplicate_entries": 0,
      "duplicate_object_ids": 0,
      "synthetic_ids": 7,
      "service_principals_joined": 1,
      "service_principals_unmatched": 0,
      "unresolved_references": 2,
      "edges": 11
    }
    "#);
}

#[test]
fn test_unified_edges() {
    let output = run(OutputFormat::Unified);
    let id = |rid: u32| format!("{SID}-{rid}");
    let (admin, alice, bob) = (id(500), id(1001), id(1022));
    let (admins, developers, webservers) = (id(512), id(1002), id(1025));
    let (web01, web02) = (id(1026), id(1027));

    assert_eq!(
        edge_triples(output.graph.edges()),
        [
            ("MemberOf", admin.as_str(), admins.as_str()),
            ("MemberOf", alice.as_str(), developers.as_str()),
            ("MemberOf", bob.as_str(), developers.as_str()),
            ("MemberOf", web01.as_str(), webservers.as_str()),
            ("MemberOf", web02.as_str(), webservers.as_str()),
            ("HBAC_sshd", developers.as_str(), webservers.as_str()),
            ("HBAC_sudo_i", developers.as_str(), webservers.as_str()),
            ("HBAC_sshd", admin.as_str(), web01.as_str()),
            ("HBAC_sshd", admin.as_str(), web02.as_str()),
            ("Sudoer_/usr/bin/systemctl_as_root", developers.as_str(), webservers.as_str()),
            ("Sudoer_/usr/bin/less_as_root", alice.as_str(), web02.as_str()),
        ]
    );
}

#[test]
fn test_unified_nodes() {
    let output = run(OutputFormat::Unified);
    let GraphOutput::Unified(document) = &output.graph else {
        panic!("expected unified output");
    };

    assert_eq!(document.metadata.source_kind, "IDMGraph");
    let kinds: Vec<&str> = document
        .graph
        .nodes
        .iter()
        .map(|node| node.kinds[0].as_str())
        .collect();
    assert_eq!(
        kinds,
        [
            "Domain",
            "User",
            "User",
            "User",
            "Computer",
            "Computer",
            "Group",
            "Group",
            "Group",
            "HBACService",
            "HBACService",
            "HBACServiceGroup",
        ]
    );

    let node = |id: &str| {
        let node = document
            .graph
            .nodes
            .iter()
            .find(|node| node.id == id)
            .unwrap();
        serde_json::to_value(node).unwrap()
    };

    assert_eq!(
        node(SID),
        json!({
            "id": SID,
            "kinds": ["Domain"],
            "properties": {
                "name": "EXAMPLE",
                "domain": "example.com",
                "domainsid": SID,
                "distinguishedname": "cn=example.com,cn=ad,cn=etc,dc=example,dc=com",
                "highvalue": true,
                "description": ""
            }
        })
    );
    assert_eq!(
        node(&format!("{SID}-1026"))["properties"],
        json!({
            "name": "web01.example.com",
            "distinguishedname": "fqdn=web01.example.com,cn=computers,cn=accounts,dc=example,dc=com",
            "domainsid": SID,
            "description": "",
            "hasspn": true,
            "serviceprincipalnames": "HTTP/web01.example.com@EXAMPLE.COM"
        })
    );
    assert_eq!(node(&format!("{SID}-1027"))["properties"]["hasspn"], false);

    let bob = node(&format!("{SID}-1022"));
    assert_eq!(bob["properties"]["name"], "bob@EXAMPLE.COM");
    assert_eq!(bob["properties"]["enabled"], false);

    let alice = node(&format!("{SID}-1001"));
    assert_eq!(alice["properties"]["description"], "Platform developer");
    assert_eq!(alice["properties"]["enabled"], true);
}

#[test]
fn test_legacy_documents() {
    let output = run(OutputFormat::Legacy);
    let documents = output.documents().unwrap();

    let names: Vec<&str> = documents.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["domains", "users", "groups", "computers", "edges"]);

    let counts: Vec<&serde_json::Value> = documents[..4]
        .iter()
        .map(|(_, document)| &document["meta"]["count"])
        .collect();
    assert_eq!(counts, [&json!(1), &json!(3), &json!(3), &json!(2)]);

    let groups = &documents[2].1["data"];
    assert_eq!(
        groups[1]["Members"],
        json!([
            { "ObjectIdentifier": format!("{SID}-1001"), "ObjectType": "User" },
            { "ObjectIdentifier": format!("{SID}-1022"), "ObjectType": "User" },
            { "ObjectIdentifier": format!("{SID}-512"), "ObjectType": "Group" }
        ])
    );
    assert_eq!(groups[2]["Members"].as_array().unwrap().len(), 2);
    assert!(documents[3].1["data"][0].get("Members").is_none());

    let edges = &documents[4].1["graph"];
    assert_eq!(edges["nodes"], json!([]));
    assert_eq!(edges["edges"].as_array().unwrap().len(), 6);
}

#[parameterized(
    unified = { OutputFormat::Unified, 11, 2 },
    legacy = { OutputFormat::Legacy, 6, 1 },
)]
fn test_edge_and_unresolved_counts(format: OutputFormat, edges: usize, unresolved: usize) {
    let output = run(format);
    assert_eq!(output.graph.edges().len(), edges);
    assert_eq!(output.context.stats.edges, edges);
    assert_eq!(output.context.stats.unresolved_references, unresolved);
}

#[test]
fn test_anonymous_export_degrades() {
    let entries: Vec<_> = realm_entries().into_iter().skip(1).collect();
    let output = Pipeline::new(IngestConfig::new("example.com"))
        .run(&entries)
        .unwrap();

    assert_eq!(output.context.realm.sid, SID);
    assert_eq!(output.context.realm.confidence, SidConfidence::Degraded);
    assert_eq!(
        output.context.warnings,
        [RunWarning::DegradedRealmSid {
            source_dn: "cn=admins,cn=groups,cn=accounts,dc=example,dc=com".to_string()
        }]
    );
    assert_eq!(output.context.stats.entity_count(EntityKind::Domain), 0);

    // 18 entries, bob now at index 2.
    let GraphOutput::Unified(document) = &output.graph else {
        panic!("expected unified output");
    };
    assert!(
        document
            .graph
            .nodes
            .iter()
            .any(|node| node.id == format!("{SID}-1020"))
    );
}

#[test]
fn test_duplicate_dn_keeps_first() {
    let mut entries = realm_entries();
    let duplicate = DirectoryEntry::new(
        entries[2].dn().to_uppercase(),
        Vec::<(String, Vec<String>)>::new(),
    )
    .with_attr("cn", "Impostor")
    .with_attr("uid", "alice")
    .with_attr("ipaUniqueID", "ffffffff")
    .with_attr("krbPrincipalName", "alice@EXAMPLE.COM");
    entries.push(duplicate);

    let output = Pipeline::new(IngestConfig::new("example.com"))
        .run(&entries)
        .unwrap();

    assert_eq!(output.context.stats.duplicate_entries, 1);
    assert_eq!(output.context.stats.entity_count(EntityKind::User), 3);
    assert_eq!(
        output.context.warnings,
        [RunWarning::DuplicateDn {
            dn: "UID=ALICE,CN=USERS,CN=ACCOUNTS,DC=EXAMPLE,DC=COM".to_string()
        }]
    );
}

#[test]
fn test_node_ids_stay_unique_when_source_sid_matches_synthetic() {
    let output = Pipeline::new(IngestConfig::new("example.com"))
        .run(&realm_entries_with_clashing_sid())
        .unwrap();
    let GraphOutput::Unified(document) = &output.graph else {
        panic!("expected unified output");
    };

    let ids: Vec<&str> = document.graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());

    let clashing = format!("{SID}-1026");
    let owner = document.graph.nodes.iter().find(|node| node.id == clashing).unwrap();
    assert_eq!(owner.kinds, ["User"]);

    assert_eq!(output.context.stats.duplicate_object_ids, 1);
    assert_eq!(output.context.stats.entity_count(EntityKind::Group), 2);
    assert_eq!(
        output.context.warnings,
        [RunWarning::DuplicateObjectId {
            id: clashing,
            dn: "cn=webservers,cn=hostgroups,cn=accounts,dc=example,dc=com".to_string(),
        }]
    );
}

#[test]
fn test_rerun_is_deterministic() {
    let first = run(OutputFormat::Unified);
    let second = run(OutputFormat::Unified);
    assert_eq!(first.graph, second.graph);
    assert_eq!(first.context.stats, second.context.stats);
}

#[test]
fn test_custom_source_kind() {
    let output = Pipeline::new(IngestConfig::new("example.com").with_source_kind("FreeIPA"))
        .run(&realm_entries())
        .unwrap();
    let documents = output.documents().unwrap();
    assert_eq!(documents[0].0, "graph");
    assert_eq!(documents[0].1["metadata"]["source_kind"], "FreeIPA");
}
