//! Typed message channel into the map
//!
//! Any number of producers (HTTP handlers, the poller) hold a cloneable
//! [`MapSignalSender`]; exactly one consumer owns the receiver and the reconciler.

use crate::core::{Coordinate, PositionReading};
use crate::map::fence::{Ticket, TicketIssuer};
use thiserror::Error;
use tokio::sync::mpsc;

/// Events the map reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum MapSignal {
    /// Automatic reading from a poll or the manual controls
    Reading(PositionReading),
    /// Vehicle fix: applied as a reading and then focused.
    /// Unfenced when `ticket` is `None`.
    Focus {
        reading: PositionReading,
        ticket: Option<Ticket>,
    },
    /// User click on the map
    DropPin(Coordinate),
    /// Resume automatic tracking
    ClearManualPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("map signal channel closed")]
    Closed,
}

/// Producer handle
#[derive(Debug, Clone)]
pub struct MapSignalSender {
    tx: mpsc::UnboundedSender<MapSignal>,
    tickets: TicketIssuer,
}

/// Consumer handle
#[derive(Debug)]
pub struct MapSignalReceiver {
    rx: mpsc::UnboundedReceiver<MapSignal>,
}

/// Create a connected sender/receiver pair
pub fn channel() -> (MapSignalSender, MapSignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MapSignalSender {
            tx,
            tickets: TicketIssuer::new(),
        },
        MapSignalReceiver { rx },
    )
}

impl MapSignalSender {
    pub fn send(&self, signal: MapSignal) -> Result<(), SignalError> {
        self.tx.send(signal).map_err(|_| SignalError::Closed)
    }

    pub fn reading(&self, reading: PositionReading) -> Result<(), SignalError> {
        self.send(MapSignal::Reading(reading))
    }

    pub fn focus(&self, reading: PositionReading, ticket: Option<Ticket>) -> Result<(), SignalError> {
        self.send(MapSignal::Focus { reading, ticket })
    }

    pub fn drop_pin(&self, coordinate: Coordinate) -> Result<(), SignalError> {
        self.send(MapSignal::DropPin(coordinate))
    }

    pub fn clear_manual_pin(&self) -> Result<(), SignalError> {
        self.send(MapSignal::ClearManualPin)
    }

    /// Issue a fence ticket for a fetch that is about to start
    pub fn issue_ticket(&self) -> Ticket {
        self.tickets.issue()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl MapSignalReceiver {
    /// Wait for the next signal; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<MapSignal> {
        self.rx.recv().await
    }

    /// Non-blocking receive for drain loops
    pub fn try_recv(&mut self) -> Option<MapSignal> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_arrive_in_order() {
        let (tx, mut rx) = channel();
        tx.reading(PositionReading::new(1.0, 2.0, 3.0)).unwrap();
        tx.drop_pin(Coordinate::new(10.0, 20.0)).unwrap();
        tx.clear_manual_pin().unwrap();

        assert_eq!(rx.try_recv(), Some(MapSignal::Reading(PositionReading::new(1.0, 2.0, 3.0))));
        assert_eq!(rx.try_recv(), Some(MapSignal::DropPin(Coordinate::new(10.0, 20.0))));
        assert_eq!(rx.try_recv(), Some(MapSignal::ClearManualPin));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.clear_manual_pin(), Err(SignalError::Closed));
    }

    #[test]
    fn test_clones_share_ticket_counter() {
        let (tx, _rx) = channel();
        let other = tx.clone();
        let a = tx.issue_ticket();
        let b = other.issue_ticket();
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_dropped() {
        let (tx, mut rx) = channel();
        tx.clear_manual_pin().unwrap();
        drop(tx);
        assert_eq!(rx.recv().await, Some(MapSignal::ClearManualPin));
        assert_eq!(rx.recv().await, None);
    }
}
