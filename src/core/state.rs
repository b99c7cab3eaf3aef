//! The `State` trait implemented by everything an [`Fsm`](crate::Fsm) manages.
//!
//! A state only exposes lifecycle hooks. The machine decides when they run;
//! what they do is entirely up to the implementer.

/// Behavior of a single state held by a finite state machine.
///
/// `on_enter` and `on_exit` default to no-ops. `update` is mandatory and
/// receives the per-tick payload, whose type is fixed for the whole machine
/// through the associated `Data` type.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::State;
///
/// struct Patrol {
///     distance: f32,
/// }
///
/// impl State for Patrol {
///     type Data = f32;
///
///     fn on_enter(&mut self) {
///         self.distance = 0.0;
///     }
///
///     fn update(&mut self, delta: f32) {
///         self.distance += delta * 2.0;
///     }
/// }
///
/// let mut patrol = Patrol { distance: 10.0 };
/// patrol.on_enter();
/// patrol.update(0.5);
/// assert_eq!(patrol.distance, 1.0);
/// ```
pub trait State {
    /// Payload forwarded by [`Fsm::update`](crate::Fsm::update).
    type Data;

    /// Called when the machine transitions into this state.
    fn on_enter(&mut self) {}

    /// Called when the machine transitions away from this state.
    fn on_exit(&mut self) {}

    /// Called on every machine update while this state is current.
    fn update(&mut self, data: Self::Data);
}

/// Boxed states forward to the boxed value, which is what makes
/// `Fsm<Id, Box<dyn State<Data = D>>>` work for heterogeneous machines.
impl<T: State + ?Sized> State for Box<T> {
    type Data = T::Data;

    fn on_enter(&mut self) {
        (**self).on_enter();
    }

    fn on_exit(&mut self) {
        (**self).on_exit();
    }

    fn update(&mut self, data: Self::Data) {
        (**self).update(data);
    }
}
