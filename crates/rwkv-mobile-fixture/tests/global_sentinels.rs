//! Sentinels that live in process-wide fixture state. Kept to a single test so
//! nothing else observes the knobs while they are flipped.

mod common;

use common::Fixture;
use rwkv_mobile::{BindingError, DEFAULT_BACKEND_BUFFER_SIZE, LogLevel, RuntimeHandle};
use rwkv_mobile_fixture::knob;

#[test]
fn process_wide_sentinels_map_to_typed_failures() {
    let fx = Fixture::load();
    let none = RuntimeHandle::NULL;

    fx.set(none, knob::INIT_NULL, 1);
    assert_eq!(
        fx.rwkv.runtime_init(),
        Err(BindingError::NativeFailure {
            op: "runtime_init",
            code: 0
        })
    );
    fx.set(none, knob::INIT_NULL, 0);
    let h = fx.runtime();
    assert!(!h.is_null());

    fx.set(none, knob::BACKENDS_RC, -3);
    assert_eq!(
        fx.rwkv.get_available_backend_names(&mut [0u8; 64]),
        Err(BindingError::NativeFailure {
            op: "get_available_backend_names",
            code: -3
        })
    );
    assert_eq!(fx.rwkv.available_backend_names(DEFAULT_BACKEND_BUFFER_SIZE), None);
    assert_eq!(fx.rwkv.device_info().backends, None);
    fx.set(none, knob::BACKENDS_RC, 0);
    assert!(fx.rwkv.available_backend_names(DEFAULT_BACKEND_BUFFER_SIZE).is_some());

    fx.rwkv.set_log_level(LogLevel::Warn).unwrap();
    assert_eq!(fx.get(none, knob::LOG_LEVEL), 2);

    fx.rwkv.runtime_release(h).unwrap();
}
