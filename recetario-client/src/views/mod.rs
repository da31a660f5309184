pub mod detail;
pub mod form;
pub mod list;

/// Identifies one load request issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out increasing tickets so that only the latest response is applied.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}
