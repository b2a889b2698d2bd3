//! Small source trees written to a temp dir and analyzed end to end.

use std::path::Path;

use meshtrace_analysis::{ChainNode, Pipeline};
use meshtrace_core::{HttpVerb, MeshtraceConfig};

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn svc_pipeline() -> Pipeline {
    let config = MeshtraceConfig::from_toml(
        r#"
[scan]
service_prefix = "svc-"
service_suffix = ""
"#,
    )
    .unwrap();
    Pipeline::new(config).unwrap()
}

const CLIENT: &str = r#"
package a;

public class ItemClient {

    public Item getItem(String id) {
        String b_url = getServiceUrl("svc-b");
        return restTemplate.getForObject(b_url + "/items/{id}", Item.class, id);
    }
}
"#;

fn setup(controller: &str) -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "analyzed_services.txt", "./svc-a\n./svc-b\n");
    write(dir.path(), "svc-a/src/main/java/a/ItemClient.java", CLIENT);
    write(dir.path(), "svc-b/src/main/java/b/ItemController.java", controller);
    dir
}

#[test]
fn test_single_hop_chain() {
    let dir = setup(
        r#"
package b;

@RestController
public class ItemController {

    @GetMapping("/items/{id}")
    public Item fetchItem(@PathVariable String id) {
        return repository.find(id);
    }
}
"#,
    );

    let result = svc_pipeline().run(dir.path()).unwrap();
    assert!(result.is_clean(), "{:?}", result.errors);

    let expected = ChainNode {
        calls: vec![ChainNode {
            endpoint: Some("/items/{id}".to_string()),
            http_method: Some(HttpVerb::Get),
            count: Some(1),
            ..ChainNode::new("svc-b", "fetchItem")
        }],
        ..ChainNode::new("svc-a", "getItem")
    };
    assert_eq!(result.data.chains.roots, vec![expected]);
    assert_eq!(result.data.interactions.total_relations, 1);
}

#[test]
fn test_post_declaration_never_serves_get_call() {
    let dir = setup(
        r#"
package b;

@RestController
public class ItemController {

    @PostMapping("/items/{id}")
    public Item storeItem(@PathVariable String id, @RequestBody Item item) {
        return repository.save(item);
    }
}
"#,
    );

    let result = svc_pipeline().run(dir.path()).unwrap();
    assert_eq!(result.data.interactions.api_interactions.len(), 1);
    assert!(result.data.chains.is_empty());
}

#[test]
fn test_service_without_source_root_contributes_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path(), "analyzed_services.txt", "./svc-a\n./svc-missing\n");
    write(dir.path(), "svc-a/src/main/java/a/ItemClient.java", CLIENT);

    let result = svc_pipeline().run(dir.path()).unwrap();
    assert!(result.is_clean());
    assert_eq!(result.data.interactions.api_interactions.len(), 1);
    assert!(result.data.chains.is_empty());
}
