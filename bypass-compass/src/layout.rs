/// Register maps of the magnetometers we know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Honeywell HMC5883L
    Hmc5883l,
    /// QST QMC5883L, the usual chip on "HMC5883L" breakout boards these days
    Qmc5883l,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisOrder {
    /// X, Z, Y
    Xzy,
    /// X, Y, Z
    Xyz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endian {
    Big,
    Little,
}

impl Layout {
    pub fn address(&self) -> u8 {
        match self {
            Layout::Hmc5883l => 0x1E,
            Layout::Qmc5883l => 0x0D,
        }
    }

    /// (register, value) pairs that select continuous measurement mode
    pub(crate) fn init_sequence(&self) -> &'static [(u8, u8)] {
        match self {
            // 8 samples averaged at 15 Hz, gain 390 LSb/G, continuous mode
            Layout::Hmc5883l => &[(0x00, 0x70), (0x01, 0xA0), (0x02, 0x00)],
            // set/reset period, then continuous at 200 Hz, 8 G range, OSR 512
            Layout::Qmc5883l => &[(0x0B, 0x01), (0x09, 0x1D)],
        }
    }

    /// first of six consecutive axis registers
    pub(crate) fn data_register(&self) -> u8 {
        match self {
            Layout::Hmc5883l => 0x03,
            Layout::Qmc5883l => 0x00,
        }
    }

    pub(crate) fn axis_order(&self) -> AxisOrder {
        match self {
            Layout::Hmc5883l => AxisOrder::Xzy,
            Layout::Qmc5883l => AxisOrder::Xyz,
        }
    }

    pub(crate) fn endian(&self) -> Endian {
        match self {
            Layout::Hmc5883l => Endian::Big,
            Layout::Qmc5883l => Endian::Little,
        }
    }
}
