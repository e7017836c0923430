//! Static registration through [`inventory`].

use crate::registry::Registry;

/// A registration function submitted with [`auto_register!`](crate::auto_register).
pub struct AutoRegisterFunc(pub fn(&mut Registry));

inventory::collect!(AutoRegisterFunc);

// Always submitted, so its absence means the platform is unsupported.
inventory::submit! {
    AutoRegisterFunc(mark_available)
}

fn mark_available(registry: &mut Registry) {
    registry.auto_registered = true;
}

pub(crate) fn register_all(registry: &mut Registry) {
    for func in inventory::iter::<AutoRegisterFunc> {
        (func.0)(registry);
    }
}

/// Submits a `fn(&mut Registry)` to run on [`Registry::auto_register`].
///
/// Must be used at item position.
///
/// ```no_run
/// use og_serial::registry::Registry;
///
/// fn register_nothing(_: &mut Registry) {}
///
/// og_serial::auto_register!(register_nothing);
/// ```
#[macro_export]
macro_rules! auto_register {
    ($func:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::__macro_exports::AutoRegisterFunc($func)
        }
    };
}
