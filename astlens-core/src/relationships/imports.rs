use crate::tree::ClusterFile;
use indexmap::IndexSet;

/// Path segments carrying one of these are taken as the service name
const ROLE_MARKERS: [&str; 3] = ["service", "controller", "repository"];

/// Guess the file a module path refers to.
///
/// The first `/`-separated segment mentioning a role marker wins (so
/// `../users/user.service` gives `user.service`); otherwise the last segment
/// up to its first `.`. Returns `None` when nothing usable remains.
pub fn service_from_import(import_path: &str) -> Option<&str> {
    let mut segments = import_path.split('/');

    if let Some(segment) = segments
        .clone()
        .find(|segment| ROLE_MARKERS.iter().any(|marker| segment.contains(marker)))
    {
        return Some(segment);
    }

    segments
        .next_back()
        .and_then(|last| last.split('.').next())
        .filter(|name| !name.is_empty())
}

/// Cluster files this file imports, in import order, without repeats.
///
/// Only top-level `ImportDeclaration`s are considered; candidates that are
/// not cluster members, or are the importer itself, are dropped.
pub fn resolve_imports<'a>(file: &ClusterFile, known: &IndexSet<&'a str>) -> Vec<&'a str> {
    let mut targets: IndexSet<&'a str> = IndexSet::new();

    for node in file.body().iter().filter(|node| node.is_kind("ImportDeclaration")) {
        let Some(path) = node.source_value().filter(|path| !path.is_empty()) else {
            continue;
        };

        match service_from_import(path).and_then(|candidate| known.get(candidate)) {
            Some(&target) if target != file.id => {
                targets.insert(target);
            }
            Some(_) => {}
            None => tracing::trace!(file = %file.id, path, "import does not resolve to a cluster file"),
        }
    }

    targets.into_iter().collect()
}
