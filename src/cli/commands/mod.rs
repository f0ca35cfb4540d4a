mod category;
mod record;
mod summary;
mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let definitions = record::definitions()
        .into_iter()
        .chain(category::definitions())
        .chain(summary::definitions())
        .chain(system::definitions());
    for entry in definitions {
        registry.register(entry);
    }
    for (alias, target) in ALIASES {
        registry.alias(alias, target);
    }
}

const ALIASES: [(&str, &str); 4] = [
    ("quit", "exit"),
    ("ls", "history"),
    ("rm", "delete"),
    ("?", "help"),
];
