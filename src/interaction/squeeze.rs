//! Squeeze gesture: replace every persistent anchor with a fresh one at the
//! user's feet.

use bevy::prelude::*;

use crate::anchors::{AfterClear, AnchorLifecycle};

use super::messages::SqueezeGesture;

pub fn handle_squeeze(
    mut gestures: MessageReader<SqueezeGesture>,
    mut lifecycle: ResMut<AnchorLifecycle>,
) {
    for gesture in gestures.read() {
        info!(
            "Squeeze on {} controller: clearing anchors",
            gesture.hand.label()
        );
        lifecycle.request_clear(AfterClear::RequestAnchorAtViewer);
    }
}
