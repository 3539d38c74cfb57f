//! The weekly room × slot grid with its occupancy indexes.

use crate::bitset::BitSet;
use crate::domain::{CourseEvent, CourseId, CurriculumId, LecturerId, Registry, RoomId};
use crate::error::{Result, TimetableError};
use crate::horizon::Horizon;

use super::position::Position;

/// One week of teaching: every (room, slot) cell holds at most one event.
///
/// The grid owns the occupancy of everything placed in it: per-lecturer and
/// per-curriculum sets of absolute slots, and the remaining hours of every
/// course. A grid with week offset `w` records local slot `s` as absolute
/// slot `s + slots_per_week * w`, so copies of one week rebased to other
/// offsets never alias each other's occupancy.
///
/// Mutations go through [`assign`](Self::assign) and
/// [`remove`](Self::remove), which keep the cells, the occupied/empty
/// partition and the occupancy sets consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    horizon: Horizon,
    room_count: usize,
    week_offset: u32,
    cells: Vec<Option<CourseEvent>>,
    occupied: BitSet,
    empty: BitSet,
    lecturer_slots: Vec<BitSet>,
    curriculum_slots: Vec<BitSet>,
    remaining_hours: Vec<i64>,
}

impl TimeTable {
    /// Empty grid over every room of the registry at week offset 0.
    pub fn new(registry: &Registry) -> Self {
        let horizon = registry.horizon();
        let room_count = registry.room_count();
        let positions = room_count * horizon.slots_per_week() as usize;
        Self {
            horizon,
            room_count,
            week_offset: 0,
            cells: vec![None; positions],
            occupied: BitSet::with_capacity(positions),
            empty: BitSet::full(positions),
            lecturer_slots: vec![BitSet::new(); registry.lecturer_count()],
            curriculum_slots: vec![BitSet::new(); registry.curriculum_count()],
            remaining_hours: registry
                .courses()
                .iter()
                .map(|c| i64::from(c.course_hours))
                .collect(),
        }
    }

    #[inline]
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    #[inline]
    pub fn week_offset(&self) -> u32 {
        self.week_offset
    }

    #[inline]
    pub fn room_count(&self) -> usize {
        self.room_count
    }

    #[inline]
    pub fn position_count(&self) -> usize {
        self.cells.len()
    }

    /// Absolute slot of a local slot in this grid's week.
    #[inline]
    pub fn absolute_slot(&self, local_slot: u32) -> u32 {
        self.horizon.absolute_slot(local_slot, self.week_offset)
    }

    fn index_of(&self, position: Position) -> Result<usize> {
        let slots_per_week = self.horizon.slots_per_week();
        if position.slot >= slots_per_week {
            return Err(TimetableError::SlotOutOfRange {
                slot: position.slot,
                slots_per_week,
            });
        }
        if position.room.index() >= self.room_count {
            return Err(TimetableError::UnknownRoom { position });
        }
        Ok(position.index(slots_per_week))
    }

    /// Position with dense index `index`; `index < position_count()`.
    #[inline]
    pub fn position_at(&self, index: usize) -> Position {
        Position::from_index(index, self.horizon.slots_per_week())
    }

    pub fn get(&self, position: Position) -> Option<&CourseEvent> {
        let index = self.index_of(position).ok()?;
        self.cells[index].as_ref()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.empty.len()
    }

    /// Occupied positions in ascending (room, slot) order.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.occupied.iter().map(|i| self.position_at(i))
    }

    /// Empty positions in ascending (room, slot) order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.empty.iter().map(|i| self.position_at(i))
    }

    /// The `n`-th occupied position in ascending order.
    pub fn nth_occupied(&self, n: usize) -> Option<Position> {
        self.occupied.nth(n).map(|i| self.position_at(i))
    }

    /// Placed events with their positions, ascending by position.
    pub fn placed_events(&self) -> impl Iterator<Item = (Position, &CourseEvent)> + '_ {
        self.occupied.iter().filter_map(move |i| {
            self.cells[i]
                .as_ref()
                .map(|event| (self.position_at(i), event))
        })
    }

    /// Occupied positions in `room`, ascending by slot.
    pub fn room_positions(&self, room: RoomId) -> impl Iterator<Item = Position> + '_ {
        let spw = self.horizon.slots_per_week();
        (0..spw)
            .map(move |slot| Position::new(room, slot))
            .filter(|p| self.is_occupied(*p))
    }

    #[inline]
    pub fn lecturer_busy(&self, lecturer: LecturerId, absolute_slot: u32) -> bool {
        self.lecturer_slots[lecturer.index()].contains(absolute_slot as usize)
    }

    #[inline]
    pub fn curriculum_busy(&self, curriculum: CurriculumId, absolute_slot: u32) -> bool {
        self.curriculum_slots[curriculum.index()].contains(absolute_slot as usize)
    }

    /// Absolute slots taken by `curriculum` in this grid.
    pub fn curriculum_slots(&self, curriculum: CurriculumId) -> &BitSet {
        &self.curriculum_slots[curriculum.index()]
    }

    /// Occupied absolute slots of every curriculum, in id order.
    pub fn curriculum_occupancy(&self) -> impl Iterator<Item = &BitSet> + '_ {
        self.curriculum_slots.iter()
    }

    /// Absolute slots taken by `lecturer` in this grid.
    pub fn lecturer_slots(&self, lecturer: LecturerId) -> &BitSet {
        &self.lecturer_slots[lecturer.index()]
    }

    /// First candidate lecturer of `event` free at `absolute_slot`.
    pub fn first_free_lecturer(&self, event: &CourseEvent, absolute_slot: u32) -> Option<LecturerId> {
        event
            .lecturers()
            .iter()
            .copied()
            .find(|&l| !self.lecturer_busy(l, absolute_slot))
    }

    /// Hours of `course` still to schedule. Placing decrements, removing
    /// increments and splitting an event adds one.
    #[inline]
    pub fn remaining_hours(&self, course: CourseId) -> i64 {
        self.remaining_hours[course.index()]
    }

    pub fn add_course_hours(&mut self, course: CourseId, delta: i64) {
        self.remaining_hours[course.index()] += delta;
    }

    /// Overrides the remaining hours of `course`, e.g. to count only the
    /// events of one sub-problem instead of the whole term.
    pub fn set_remaining_hours(&mut self, course: CourseId, hours: i64) {
        self.remaining_hours[course.index()] = hours;
    }

    /// Places `event` at `position` with its first free lecturer.
    ///
    /// An event already at `position` is removed first and returned. The
    /// caller is expected to have checked feasibility; if no candidate
    /// lecturer is free the grid is left unchanged and
    /// [`TimetableError::NoFreeLecturer`] is returned.
    pub fn assign(&mut self, mut event: CourseEvent, position: Position) -> Result<Option<CourseEvent>> {
        let index = self.index_of(position)?;
        let absolute_slot = self.absolute_slot(position.slot);

        let displaced_lecturer = match &self.cells[index] {
            Some(current) => Some(
                current
                    .assigned_lecturer()
                    .ok_or(TimetableError::MissingAssignedLecturer { event: current.id() })?,
            ),
            None => None,
        };
        let displaced = displaced_lecturer
            .and_then(|lecturer| self.vacate(index, absolute_slot).map(|e| (e, lecturer)));

        let Some(lecturer) = self.first_free_lecturer(&event, absolute_slot) else {
            if let Some((previous, lecturer)) = displaced {
                self.occupy(index, absolute_slot, previous, lecturer);
            }
            return Err(TimetableError::NoFreeLecturer {
                event: event.id(),
                slot: absolute_slot,
            });
        };

        event.take_assigned_lecturer();
        self.occupy(index, absolute_slot, event, lecturer);
        Ok(displaced.map(|(event, _)| event))
    }

    /// Takes the event at `position` out of the grid, releasing its
    /// lecturer and curricula. Returns `None` for an empty cell.
    pub fn remove(&mut self, position: Position) -> Result<Option<CourseEvent>> {
        let index = self.index_of(position)?;
        let Some(current) = self.cells[index].as_ref() else {
            return Ok(None);
        };
        if current.assigned_lecturer().is_none() {
            return Err(TimetableError::MissingAssignedLecturer { event: current.id() });
        }
        let absolute_slot = self.absolute_slot(position.slot);
        Ok(self.vacate(index, absolute_slot))
    }

    /// Puts a previously removed event back with the lecturer it had.
    pub(crate) fn reinstate(&mut self, event: CourseEvent, position: Position, lecturer: LecturerId) -> Result<()> {
        let index = self.index_of(position)?;
        if self.cells[index].is_some() {
            return Err(TimetableError::InvariantViolated(format!(
                "cannot reinstate {} at occupied {position}",
                event.id()
            )));
        }
        let absolute_slot = self.absolute_slot(position.slot);
        self.occupy(index, absolute_slot, event, lecturer);
        Ok(())
    }

    fn occupy(&mut self, index: usize, absolute_slot: u32, mut event: CourseEvent, lecturer: LecturerId) {
        let slot = absolute_slot as usize;
        self.lecturer_slots[lecturer.index()].insert(slot);
        for curriculum in event.curricula() {
            self.curriculum_slots[curriculum.index()].insert(slot);
        }
        self.remaining_hours[event.course().index()] -= 1;
        event.set_assigned_lecturer(lecturer);
        self.cells[index] = Some(event);
        self.empty.remove(index);
        self.occupied.insert(index);
    }

    fn vacate(&mut self, index: usize, absolute_slot: u32) -> Option<CourseEvent> {
        let slot = absolute_slot as usize;
        let mut event = self.cells[index].take()?;
        if let Some(lecturer) = event.take_assigned_lecturer() {
            self.lecturer_slots[lecturer.index()].remove(slot);
        }
        for curriculum in event.curricula() {
            self.curriculum_slots[curriculum.index()].remove(slot);
        }
        self.remaining_hours[event.course().index()] += 1;
        self.occupied.remove(index);
        self.empty.insert(index);
        Some(event)
    }

    /// Moves the grid to another week and rebuilds its occupancy sets
    /// from the placed events.
    pub fn rebase(&mut self, week_offset: u32) {
        self.week_offset = week_offset;
        self.lecturer_slots.iter_mut().for_each(BitSet::clear);
        self.curriculum_slots.iter_mut().for_each(BitSet::clear);
        let spw = self.horizon.slots_per_week();
        for index in self.occupied.iter() {
            let Some(event) = self.cells[index].as_ref() else {
                continue;
            };
            let local_slot = (index % spw as usize) as u32;
            let slot = self.horizon.absolute_slot(local_slot, week_offset) as usize;
            if let Some(lecturer) = event.assigned_lecturer() {
                self.lecturer_slots[lecturer.index()].insert(slot);
            }
            for curriculum in event.curricula() {
                self.curriculum_slots[curriculum.index()].insert(slot);
            }
        }
    }

    /// Copy of this grid moved to `week_offset`.
    pub fn rebased(&self, week_offset: u32) -> Self {
        let mut copy = self.clone();
        copy.rebase(week_offset);
        copy
    }

    /// Verifies that cells, the occupied/empty partition and the occupancy
    /// sets agree, and that no lecturer or curriculum is double booked.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(TimetableError::InvariantViolated(msg));

        if self.occupied.len() + self.empty.len() != self.cells.len() {
            return violation(format!(
                "occupied ({}) + empty ({}) != positions ({})",
                self.occupied.len(),
                self.empty.len(),
                self.cells.len()
            ));
        }

        let mut lecturer_slots = vec![BitSet::new(); self.lecturer_slots.len()];
        let mut curriculum_slots = vec![BitSet::new(); self.curriculum_slots.len()];

        for (index, cell) in self.cells.iter().enumerate() {
            let position = self.position_at(index);
            match cell {
                None => {
                    if !self.empty.contains(index) || self.occupied.contains(index) {
                        return violation(format!("empty {position} not in the empty set"));
                    }
                }
                Some(event) => {
                    if !self.occupied.contains(index) || self.empty.contains(index) {
                        return violation(format!("occupied {position} not in the occupied set"));
                    }
                    let slot = self.absolute_slot(position.slot) as usize;
                    let Some(lecturer) = event.assigned_lecturer() else {
                        return violation(format!("{} at {position} has no lecturer", event.id()));
                    };
                    if !event.lecturers().contains(&lecturer) {
                        return violation(format!("{} taught by a non-candidate lecturer", event.id()));
                    }
                    if !lecturer_slots[lecturer.index()].insert(slot) {
                        return violation(format!("{lecturer} double booked at slot {slot}"));
                    }
                    for curriculum in event.curricula() {
                        if !curriculum_slots[curriculum.index()].insert(slot) {
                            return violation(format!("{curriculum} double booked at slot {slot}"));
                        }
                    }
                }
            }
        }

        if lecturer_slots != self.lecturer_slots {
            return violation("lecturer occupancy out of sync with placed events".into());
        }
        if curriculum_slots != self.curriculum_slots {
            return violation("curriculum occupancy out of sync with placed events".into());
        }
        Ok(())
    }
}
