use colored::*;
use eyre::Result;
use std::path::Path;

use super::load_composition;
use mixkit::config::Config;
use mixkit::registry::{CompositionStep, Origin, TypeId, TypeRegistry};

pub fn run(manifest: &Path, mermaid: bool, config: &Config) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let registry = &composition.registry;

    if mermaid {
        print!("{}", mermaid_diagram(registry));
        return Ok(());
    }

    println!("{}", "Hierarchy:".bold());
    println!();
    for root in registry.iter().filter(|t| t.superclass().is_none()) {
        print_node(registry, root.id(), 1);
    }

    Ok(())
}

fn print_node(registry: &TypeRegistry, ty: TypeId, depth: usize) {
    let indent = "  ".repeat(depth);
    let mixins: Vec<&str> = registry.mixins(ty).iter().map(|m| registry.name_of(*m)).collect();
    if mixins.is_empty() {
        println!("{}{}", indent, registry.name_of(ty).green());
    } else {
        println!(
            "{}{} {}",
            indent,
            registry.name_of(ty).green(),
            format!("+ {}", mixins.join(", ")).dimmed()
        );
    }

    for child in registry.iter().filter(|t| t.superclass() == Some(ty)) {
        print_node(registry, child.id(), depth + 1);
    }
}

// mermaid identifiers cannot hold `~` or spaces
fn mermaid_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Render the registry as a mermaid class diagram
pub fn mermaid_diagram(registry: &TypeRegistry) -> String {
    let mut out = String::from("classDiagram\n");

    for t in registry.iter() {
        let id = mermaid_id(t.name());
        out.push_str(&format!("  class {} {{\n", id));
        for (name, value, _) in t.table().iter() {
            if value.is_callable() {
                out.push_str(&format!("    +{}()\n", name));
            } else {
                out.push_str(&format!("    +{}\n", name));
            }
        }
        out.push_str("  }\n");
    }

    for t in registry.iter() {
        let id = mermaid_id(t.name());
        if let Some(parent) = t.superclass() {
            out.push_str(&format!("  {} <|-- {}\n", mermaid_id(registry.name_of(parent)), id));
        }
        for mixin in t.mixins() {
            out.push_str(&format!("  {} ..> {} : mixin\n", id, mermaid_id(registry.name_of(*mixin))));
        }
        for step in t.steps() {
            if let CompositionStep::Augmented {
                source: Origin::Trait(source),
            } = step
            {
                out.push_str(&format!("  {} ..> {} : augment\n", id, mermaid_id(registry.name_of(*source))));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixkit::registry::{TraitSource, TypeDef};
    use mixkit::value::{Map, Method, Value};

    #[test]
    fn test_mermaid_diagram_edges() {
        let mut registry = TypeRegistry::new();
        let base = registry
            .define("Base", TypeDef::new().member("draw", Method::constant("draw", Value::Null)))
            .unwrap();
        let derived = registry.derive(base, Map::new()).unwrap();
        let mixin = registry.define("Mixin", TypeDef::new().member("size", 1)).unwrap();
        let host = registry.define("Host", TypeDef::new()).unwrap();
        registry.mixin(host, &[mixin]).unwrap();
        registry.augment(host, &[TraitSource::Type(base)]).unwrap();

        let diagram = mermaid_diagram(&registry);

        assert!(diagram.starts_with("classDiagram\n"));
        assert!(diagram.contains("    +draw()\n"));
        assert!(diagram.contains("    +size\n"));
        assert!(diagram.contains(&format!("  Base <|-- {}\n", mermaid_id(registry.name_of(derived)))));
        assert!(diagram.contains("  Host ..> Mixin : mixin\n"));
        assert!(diagram.contains("  Host ..> Base : augment\n"));
        assert!(!diagram.contains('~'));
    }
}
