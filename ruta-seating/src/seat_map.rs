use serde::{Deserialize, Serialize};

/// Fixed 2-2 coach layout: two seats, an aisle, two seats.
pub const SEATS_PER_ROW: u32 = 4;

/// A logical seat in the grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    /// `S<n>`, 1-based and contiguous across the whole vehicle
    pub id: String,
    pub row: u32,
    /// 0..4 within the row; the aisle sits between columns 1 and 2
    pub column: u32,
}

/// One row of the grid. Slots are fixed-width; `None` marks a
/// structural gap in a partial last row, not a seat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatRow {
    pub index: u32,
    pub slots: Vec<Option<Seat>>,
}

impl SeatRow {
    /// Seats actually present in this row, gaps skipped
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.slots.iter().flatten()
    }
}

/// The generated grid for one vehicle's capacity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatMap {
    pub total_seats: u32,
    pub rows: Vec<SeatRow>,
}

impl SeatMap {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn seat_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.seats().map(|seat| seat.id.clone()))
            .collect()
    }

    pub fn contains(&self, seat_id: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.seats().any(|seat| seat.id == seat_id))
    }
}

/// Canonical identifier for the n-th seat (1-based)
pub fn seat_id(n: u32) -> String {
    format!("S{}", n)
}

/// Build the deterministic seat grid for a vehicle.
///
/// Seats are numbered `1..=total_seats` and filled row-major into rows
/// of [`SEATS_PER_ROW`]; the last row keeps its full slot width with
/// gaps where the numbering ran out. Two calls with the same capacity
/// produce identical maps.
pub fn generate_seat_map(total_seats: u32) -> Result<SeatMap, SeatingError> {
    if total_seats == 0 {
        return Err(SeatingError::InvalidCapacity(total_seats));
    }

    let row_count = total_seats.div_ceil(SEATS_PER_ROW);
    let mut rows = Vec::with_capacity(row_count as usize);

    for row_index in 0..row_count {
        let mut slots = Vec::with_capacity(SEATS_PER_ROW as usize);
        for column in 0..SEATS_PER_ROW {
            let number = row_index * SEATS_PER_ROW + column + 1;
            if number <= total_seats {
                slots.push(Some(Seat {
                    id: seat_id(number),
                    row: row_index,
                    column,
                }));
            } else {
                slots.push(None);
            }
        }
        rows.push(SeatRow {
            index: row_index,
            slots,
        });
    }

    Ok(SeatMap { total_seats, rows })
}

#[derive(Debug, thiserror::Error)]
pub enum SeatingError {
    #[error("Invalid vehicle capacity: {0}")]
    InvalidCapacity(u32),
}
