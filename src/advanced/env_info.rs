// Read-only runtime/platform metadata for GET /info.

use std::{collections::BTreeMap, env::consts};

pub fn runtime_info() -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();

    info.insert("bench.version".into(), env!("CARGO_PKG_VERSION").into());
    info.insert("bench.name".into(), env!("CARGO_PKG_NAME").into());
    info.insert(
        "build.profile".into(),
        if cfg!(debug_assertions) { "debug" } else { "release" }.into(),
    );

    info.insert("os.name".into(), consts::OS.into());
    info.insert("os.family".into(), consts::FAMILY.into());
    info.insert("os.arch".into(), consts::ARCH.into());

    info.insert("cpu.logical".into(), num_cpus::get().to_string());
    info.insert("cpu.physical".into(), num_cpus::get_physical().to_string());

    info
}
