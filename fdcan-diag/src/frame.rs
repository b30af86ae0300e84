//! CAN-FD frame object

/// Bus frame identifier
///
/// Holds up to 29 bits. Values that fit into 11 bits are transmitted with a standard identifier,
/// larger values with an extended one. A zero identifier marks a vacant slot in the
/// latest-value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Id(u32);

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidId;

impl Id {
    pub const MAX_STANDARD_VALUE: u32 = 0x7ff;
    pub const MAX_VALUE: u32 = 0x1fff_ffff;
    pub const VACANT: Id = Id(0);

    pub const fn new(value: u32) -> Option<Self> {
        if value <= Self::MAX_VALUE {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn from_truncating(value: u32) -> Self {
        Self(value & Self::MAX_VALUE)
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    pub const fn is_extended(self) -> bool {
        self.0 > Self::MAX_STANDARD_VALUE
    }

    pub const fn is_vacant(self) -> bool {
        self.0 == Self::VACANT.0
    }
}

impl From<Id> for u32 {
    fn from(value: Id) -> Self {
        value.as_raw()
    }
}

impl TryFrom<u32> for Id {
    type Error = InvalidId;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidId)
    }
}

/// CAN-FD-compatible data length
///
/// Data length code (DLC) of CAN-FD frames supports limited data length options.
/// Classic CAN frames support a subset of CAN-FD length options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataLength(u8);

impl DataLength {
    pub const MAX: usize = 64;

    pub const fn new(value: usize) -> Option<Self> {
        let floor = Self::new_floor(value);
        if floor.as_usize() == value {
            Some(floor)
        } else {
            None
        }
    }

    pub const fn new_floor(value: usize) -> Self {
        let floor = match value {
            0..8 => value,
            8..24 => value / 4 * 4,
            24..32 => value / 8 * 8,
            32..64 => value / 16 * 16,
            64.. => 64,
        };
        Self(floor as u8)
    }

    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<DataLength> for usize {
    fn from(value: DataLength) -> Self {
        value.as_usize()
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidLength;

/// CAN-FD Frame compatible data vector
///
/// Bytes beyond the data length are kept zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Data {
    length: DataLength,
    bytes: [u8; DataLength::MAX],
}

impl Data {
    /// Creates a new vector from a slice of compatible length.
    pub fn new(data: &[u8]) -> Result<Self, InvalidLength> {
        let length = DataLength::new(data.len()).ok_or(InvalidLength)?;
        let mut bytes = [0; DataLength::MAX];
        bytes[..data.len()].copy_from_slice(data);

        Ok(Self { length, bytes })
    }

    pub const fn new_zeros(length: DataLength) -> Self {
        Self {
            length,
            bytes: [0; DataLength::MAX],
        }
    }

    pub fn length(&self) -> DataLength {
        self.length
    }
}

impl core::ops::Deref for Data {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes[..usize::from(self.length)]
    }
}

impl core::ops::DerefMut for Data {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.bytes[..usize::from(self.length)]
    }
}

/// A single CAN-FD data frame
///
/// Frames are plain values; drivers copy them in and out of their own buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub id: Id,
    pub data: Data,
}

impl Frame {
    /// Zero-length frame with the vacant identifier
    pub const EMPTY: Frame = Frame {
        id: Id::VACANT,
        data: Data::new_zeros(DataLength(0)),
    };

    pub fn new(id: Id, data: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            id,
            data: Data::new(data)?,
        })
    }

    pub fn length(&self) -> DataLength {
        self.data.length()
    }
}
