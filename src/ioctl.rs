//! Control command numbers.
//!
//! A command packs four fields into a `u32`, using the common Linux layout:
//!
//! | bits  | field     |
//! |-------|-----------|
//! | 0-7   | index     |
//! | 8-15  | group     |
//! | 16-29 | size      |
//! | 30-31 | direction |

const NR_BITS: u32 = 8;
const GROUP_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;
const DIR_BITS: u32 = 2;

const NR_SHIFT: u32 = 0;
const GROUP_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = GROUP_SHIFT + GROUP_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

const NR_MASK: u32 = (1 << NR_BITS) - 1;
const GROUP_MASK: u32 = (1 << GROUP_BITS) - 1;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;
const DIR_MASK: u32 = (1 << DIR_BITS) - 1;

/// Group identifier of the capture device's commands.
pub const MAGIC: u8 = b'k';

/// Highest command index in the group.
pub const MAX_NR: u8 = 3;

const ARG_SIZE: u16 = core::mem::size_of::<i32>() as u16;

/// Store a new control value.
pub const SET_NUM: Cmd = Cmd::iow(MAGIC, 1, ARG_SIZE);
/// Fetch the control value.
pub const GET_NUM: Cmd = Cmd::ior(MAGIC, 2, ARG_SIZE);
/// Replace the control value with twice the argument and return it.
pub const EXCHANGE_NUM: Cmd = Cmd::iowr(MAGIC, 3, ARG_SIZE);

/// Transfer direction bits, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dir(u32);

impl Dir {
    pub const NONE: Dir = Dir(0);
    /// Caller writes an argument to the device.
    pub const WRITE: Dir = Dir(1);
    /// Caller reads a result from the device.
    pub const READ: Dir = Dir(2);
    pub const READ_WRITE: Dir = Dir(3);

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(&self, other: Dir) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cmd(pub u32);

impl Cmd {
    pub const fn new(dir: Dir, group: u8, nr: u8, size: u16) -> Self {
        Cmd(((dir.0 & DIR_MASK) << DIR_SHIFT)
            | ((group as u32) << GROUP_SHIFT)
            | ((nr as u32) << NR_SHIFT)
            | (((size as u32) & SIZE_MASK) << SIZE_SHIFT))
    }

    pub const fn io(group: u8, nr: u8) -> Self {
        Self::new(Dir::NONE, group, nr, 0)
    }

    pub const fn ior(group: u8, nr: u8, size: u16) -> Self {
        Self::new(Dir::READ, group, nr, size)
    }

    pub const fn iow(group: u8, nr: u8, size: u16) -> Self {
        Self::new(Dir::WRITE, group, nr, size)
    }

    pub const fn iowr(group: u8, nr: u8, size: u16) -> Self {
        Self::new(Dir::READ_WRITE, group, nr, size)
    }

    #[inline]
    pub const fn dir(&self) -> Dir {
        Dir((self.0 >> DIR_SHIFT) & DIR_MASK)
    }

    #[inline]
    pub const fn group(&self) -> u8 {
        ((self.0 >> GROUP_SHIFT) & GROUP_MASK) as u8
    }

    #[inline]
    pub const fn nr(&self) -> u8 {
        ((self.0 >> NR_SHIFT) & NR_MASK) as u8
    }

    #[inline]
    pub const fn size(&self) -> usize {
        ((self.0 >> SIZE_SHIFT) & SIZE_MASK) as usize
    }
}

impl From<u32> for Cmd {
    fn from(raw: u32) -> Self {
        Cmd(raw)
    }
}
