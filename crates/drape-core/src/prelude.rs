pub use crate::animation::{AnimatedValue, AnimationSpec, Clock, Easing, ManualClock, SystemClock};
pub use crate::color::Color;
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::host::{Container, Host, HostWindow};
pub use crate::locals::{Theme, theme, with_theme};
pub use crate::modifier::{Corners, Modifier};
pub use crate::runtime::{compose, remember, remember_state, remember_state_with_key, remember_with_key};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::semantics::{Role, Semantics, Traits};
pub use crate::signal::{Signal, signal};
pub use crate::timer::{TimerToken, Timers};
pub use crate::view::{Callback, KeyboardKind, TextStyle, View, ViewId, ViewKind};
