use crate::types::DirectoryEntry;

mod realm_export;

const REALM_EXPORT: &str = include_str!("../../testdata/realm.json");

/// The fixture realm `example.com`, SID `S-1-5-21-1000-2000-3000`, 19 entries.
fn realm_entries() -> Vec<DirectoryEntry> {
    serde_json::from_str(REALM_EXPORT).expect("fixture export should parse")
}

/// The fixture plus a user whose source SID matches the synthetic id the
/// `webservers` host group gets in a 20-entry run.
fn realm_entries_with_clashing_sid() -> Vec<DirectoryEntry> {
    let mut entries = realm_entries();
    entries.push(
        DirectoryEntry::new(
            "uid=carol,cn=users,cn=accounts,dc=example,dc=com",
            Vec::<(String, Vec<String>)>::new(),
        )
        .with_attr("cn", "Carol")
        .with_attr("uid", "carol")
        .with_attr("ipaUniqueID", "c4r0l")
        .with_attr("krbPrincipalName", "carol@EXAMPLE.COM")
        .with_attr("ipaNTSecurityIdentifier", "S-1-5-21-1000-2000-3000-1026"),
    );
    entries
}

fn edge_triples(edges: &[crate::types::Edge]) -> Vec<(&str, &str, &str)> {
    edges
        .iter()
        .map(|edge| (edge.kind.as_str(), edge.start_id(), edge.end_id()))
        .collect()
}
