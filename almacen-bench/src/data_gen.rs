//! Data generators for benchmarks

use almacen::collection::Document;
use almacen::common::Value;
use almacen::doc;
use rand::Rng;

const FIRST_NAMES: [&str; 8] = ["Ana", "Bruno", "Carla", "Diego", "Elena", "Fabio", "Gala", "Hugo"];
const CITIES: [&str; 5] = ["Lima", "Quito", "Bogota", "Santiago", "Montevideo"];

/// Generate a single flat document for save benchmarks
pub fn generate_single_doc(id: usize) -> Document {
    let mut rng = rand::thread_rng();
    doc!{
        "_id": (format!("doc-{}", id)),
        "firstName": (FIRST_NAMES[id % FIRST_NAMES.len()]),
        "age": (rng.gen_range(18..80i64)),
        "salary": (rng.gen_range(30000.0..200000.0f64)),
        "active": (rng.gen_bool(0.8))
    }
}

/// Generate documents with a small nested profile, ids `doc-0..doc-{count}`
pub fn generate_profile_docs(count: usize) -> Vec<Document> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let json = serde_json::json!({
                "_id": format!("doc-{}", i),
                "name": FIRST_NAMES[i % FIRST_NAMES.len()],
                "profile": {
                    "address": {
                        "city": CITIES[rng.gen_range(0..CITIES.len())],
                        "zip": rng.gen_range(10000..99999),
                    },
                    "score": rng.gen_range(0.0..1.0),
                    "tags": ["a", "b", uuid::Uuid::new_v4().to_string()],
                },
            });
            // the literal above is always an object
            Document::from_json(json).unwrap_or_default()
        })
        .collect()
}

/// Dot path of `depth` segments `l0.l1...`
pub fn deep_path(depth: usize) -> String {
    (0..depth).map(|i| format!("l{}", i)).collect::<Vec<_>>().join(".")
}

/// Generate a document whose value at [deep_path] of `depth` is `0`
pub fn generate_deep_doc(id: &str, depth: usize) -> Document {
    let mut value = Value::from(0);
    for i in (1..depth).rev() {
        let mut level = Document::new();
        level.put(format!("l{}", i), value);
        value = Value::Document(level);
    }
    let mut document = doc!{ "_id": id };
    document.put("l0", value);
    document
}
