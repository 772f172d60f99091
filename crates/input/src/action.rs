/// Pointer buttons that drive the orbit controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A high-level action produced by the windowing layer.
///
/// Distances are in logical pixels; `viewport_height` lets the consumer scale
/// drags independently of window size.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Rotate the camera around its target by a pointer drag.
    Orbit {
        dx: f32,
        dy: f32,
        viewport_height: f32,
    },
    /// Slide the orbit target by a pointer drag.
    Pan {
        dx: f32,
        dy: f32,
        viewport_height: f32,
    },
    /// Dolly by scroll steps; positive moves toward the target.
    Zoom(f32),
    /// Show or hide the tweak panel.
    ToggleTweakPanel,
    /// No-op (used for input that is not bound).
    Noop,
}

impl Action {
    /// Map a pointer drag with the given button held to an action.
    pub fn drag(button: PointerButton, dx: f32, dy: f32, viewport_height: f32) -> Self {
        match button {
            PointerButton::Primary => Action::Orbit {
                dx,
                dy,
                viewport_height,
            },
            PointerButton::Secondary => Action::Pan {
                dx,
                dy,
                viewport_height,
            },
        }
    }

    /// True for actions that move the camera.
    pub fn is_camera(&self) -> bool {
        matches!(
            self,
            Action::Orbit { .. } | Action::Pan { .. } | Action::Zoom(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_drag_orbits() {
        let a = Action::drag(PointerButton::Primary, 3.0, -2.0, 720.0);
        assert_eq!(
            a,
            Action::Orbit {
                dx: 3.0,
                dy: -2.0,
                viewport_height: 720.0
            }
        );
    }

    #[test]
    fn secondary_drag_pans() {
        let a = Action::drag(PointerButton::Secondary, 1.0, 1.0, 100.0);
        assert!(matches!(a, Action::Pan { .. }));
    }

    #[test]
    fn camera_classification() {
        assert!(Action::Zoom(1.0).is_camera());
        assert!(!Action::ToggleTweakPanel.is_camera());
        assert!(!Action::Noop.is_camera());
    }
}
