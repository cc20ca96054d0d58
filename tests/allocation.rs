//! Control ticks must not allocate. Kept in its own test binary so the
//! counting allocator only sees this one test.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use handsynth::{Key, MidiNote, SoundOutput, Synth};

struct CountingAlloc;

thread_local! {
    // Per thread, so the harness's own allocations don't count
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.with(|count| count.set(count.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[derive(Default)]
struct SilentOutput {
    events: u64,
}

impl SoundOutput for SilentOutput {
    fn note_on(&mut self, _note: MidiNote, _velocity: u8, _channel: u8) {
        self.events += 1;
    }

    fn note_off(&mut self, _note: MidiNote, _channel: u8) {
        self.events += 1;
    }

    fn controller(&mut self, _index: u8, _value: u8, _channel: u8) {
        self.events += 1;
    }
}

#[test]
fn retriggering_does_not_allocate() {
    let mut synth = Synth::from_key(SilentOutput::default(), Key::C_MAJOR, 1..=4).unwrap();

    let before = allocations();
    for i in 0..100 {
        let x = if i % 2 == 0 { 1.0 } else { 0.0 };
        assert!(synth.send_chord(x, 1.0));
        assert!(synth.send_note(x, 0.5));
    }
    synth.all_notes_off();
    let after = allocations();

    assert_eq!(after - before, 0);
    // Every note started was also stopped: 3 per chord, 1 per single note
    assert_eq!(synth.output().events, 100 * 3 + 100 * 3 + 100 + 100);
}
