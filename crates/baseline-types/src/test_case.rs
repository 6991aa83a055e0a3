//! Test families and the test cases recorded under them.
//!
//! A [`TestFamily`] names one baseline file per host kernel
//! (`test_network_tcp_throughput_config_5.10.json`). Inside a file, each leaf
//! is identified by a [`TestCase`]: a [`Workload`] plus, for throughput
//! families, the traffic [`Direction`]:
//!
//! ```text
//! tcp-p1024K-ws16k-g2h   -> TcpP1024KWs16K, GuestToHost
//! vsock-p64K-bd          -> VsockP64K, Bidirectional
//! ping                   -> Ping (scalar family, no direction)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::dimension::{token_serde, Dimension};
use crate::error::UnknownTokenError;

/// How a family lays out the statistic object of a configuration leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyShape {
    /// Statistic object maps `<workload>-<direction>` to target/delta pairs.
    Directional,
    /// Statistic object holds a single target/delta pair for the given workload.
    Scalar(Workload),
}

/// Performance test family, one baseline file per host kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestFamily {
    NetworkTcpThroughput,
    VsockThroughput,
    NetworkLatency,
    SnapshotRestore,
}

impl TestFamily {
    pub const ALL: [TestFamily; 4] = [
        TestFamily::NetworkTcpThroughput,
        TestFamily::VsockThroughput,
        TestFamily::NetworkLatency,
        TestFamily::SnapshotRestore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestFamily::NetworkTcpThroughput => "network_tcp_throughput",
            TestFamily::VsockThroughput => "vsock_throughput",
            TestFamily::NetworkLatency => "network_latency",
            TestFamily::SnapshotRestore => "snapshot_restore_performance",
        }
    }

    pub fn shape(&self) -> FamilyShape {
        match self {
            TestFamily::NetworkTcpThroughput | TestFamily::VsockThroughput => {
                FamilyShape::Directional
            }
            TestFamily::NetworkLatency => FamilyShape::Scalar(Workload::Ping),
            TestFamily::SnapshotRestore => FamilyShape::Scalar(Workload::Restore),
        }
    }

    /// Workloads this family records.
    pub fn workloads(&self) -> Vec<Workload> {
        Workload::ALL
            .into_iter()
            .filter(|workload| workload.family() == *self)
            .collect()
    }
}

impl fmt::Display for TestFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestFamily {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "network_tcp_throughput" => Ok(TestFamily::NetworkTcpThroughput),
            "vsock_throughput" => Ok(TestFamily::VsockThroughput),
            "network_latency" => Ok(TestFamily::NetworkLatency),
            "snapshot_restore_performance" => Ok(TestFamily::SnapshotRestore),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for TestFamily {
    const KIND: &'static str = "test";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// Traffic direction of a throughput measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    GuestToHost,
    HostToGuest,
    Bidirectional,
}

impl Direction {
    pub const ALL: [Direction; 3] = [
        Direction::GuestToHost,
        Direction::HostToGuest,
        Direction::Bidirectional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::GuestToHost => "g2h",
            Direction::HostToGuest => "h2g",
            Direction::Bidirectional => "bd",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Direction::GuestToHost => "guest-to-host",
            Direction::HostToGuest => "host-to-guest",
            Direction::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g2h" | "guest-to-host" => Ok(Direction::GuestToHost),
            "h2g" | "host-to-guest" => Ok(Direction::HostToGuest),
            "bd" | "bidirectional" => Ok(Direction::Bidirectional),
            _ => Err(UnknownTokenError::new(Self::KIND, s)),
        }
    }
}

impl Dimension for Direction {
    const KIND: &'static str = "direction";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// Workload run by a test case (payload and window sizes for TCP,
/// payload size for vsock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Workload {
    TcpP1024KWs16K,
    TcpP1024KWs256K,
    TcpP1024KWsDefault,
    TcpPDefaultWs16K,
    TcpPDefaultWs256K,
    TcpPDefaultWsDefault,
    VsockP64K,
    VsockP1024K,
    Ping,
    Restore,
}

impl Workload {
    pub const ALL: [Workload; 10] = [
        Workload::TcpP1024KWs16K,
        Workload::TcpP1024KWs256K,
        Workload::TcpP1024KWsDefault,
        Workload::TcpPDefaultWs16K,
        Workload::TcpPDefaultWs256K,
        Workload::TcpPDefaultWsDefault,
        Workload::VsockP64K,
        Workload::VsockP1024K,
        Workload::Ping,
        Workload::Restore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workload::TcpP1024KWs16K => "tcp-p1024K-ws16k",
            Workload::TcpP1024KWs256K => "tcp-p1024K-ws256k",
            Workload::TcpP1024KWsDefault => "tcp-p1024K-wsDEFAULT",
            Workload::TcpPDefaultWs16K => "tcp-pDEFAULT-ws16k",
            Workload::TcpPDefaultWs256K => "tcp-pDEFAULT-ws256k",
            Workload::TcpPDefaultWsDefault => "tcp-pDEFAULT-wsDEFAULT",
            Workload::VsockP64K => "vsock-p64K",
            Workload::VsockP1024K => "vsock-p1024K",
            Workload::Ping => "ping",
            Workload::Restore => "restore",
        }
    }

    pub fn family(&self) -> TestFamily {
        match self {
            Workload::TcpP1024KWs16K
            | Workload::TcpP1024KWs256K
            | Workload::TcpP1024KWsDefault
            | Workload::TcpPDefaultWs16K
            | Workload::TcpPDefaultWs256K
            | Workload::TcpPDefaultWsDefault => TestFamily::NetworkTcpThroughput,
            Workload::VsockP64K | Workload::VsockP1024K => TestFamily::VsockThroughput,
            Workload::Ping => TestFamily::NetworkLatency,
            Workload::Restore => TestFamily::SnapshotRestore,
        }
    }

    /// Returns true if test cases of this workload carry a direction.
    pub fn is_directional(&self) -> bool {
        self.family().shape() == FamilyShape::Directional
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workload {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workload::ALL
            .into_iter()
            .find(|workload| workload.as_str() == s)
            .ok_or_else(|| UnknownTokenError::new(Self::KIND, s))
    }
}

impl Dimension for Workload {
    const KIND: &'static str = "workload";

    fn variants() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

/// A workload together with its direction, when the workload has one.
///
/// Directional workloads always carry a direction and scalar workloads never
/// do; both constructors enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestCase {
    workload: Workload,
    direction: Option<Direction>,
}

impl TestCase {
    pub fn new(workload: Workload, direction: Option<Direction>) -> Result<Self, UnknownTokenError> {
        if workload.is_directional() != direction.is_some() {
            let token = match direction {
                Some(direction) => format!("{}-{}", workload, direction),
                None => workload.to_string(),
            };
            return Err(UnknownTokenError::new(Self::KIND, token));
        }
        Ok(Self {
            workload,
            direction,
        })
    }

    pub fn workload(&self) -> Workload {
        self.workload
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn family(&self) -> TestFamily {
        self.workload.family()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(direction) => write!(f, "{}-{}", self.workload, direction),
            None => write!(f, "{}", self.workload),
        }
    }
}

impl FromStr for TestCase {
    type Err = UnknownTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownTokenError::new(Self::KIND, s);

        if let Ok(workload) = s.parse::<Workload>() {
            return TestCase::new(workload, None).map_err(|_| unknown());
        }

        let (workload, direction) = s.rsplit_once('-').ok_or_else(unknown)?;
        let workload = workload.parse::<Workload>().map_err(|_| unknown())?;
        let direction = direction.parse::<Direction>().map_err(|_| unknown())?;
        TestCase::new(workload, Some(direction)).map_err(|_| unknown())
    }
}

impl Dimension for TestCase {
    const KIND: &'static str = "test case";

    fn variants() -> Vec<Self> {
        Workload::ALL
            .into_iter()
            .flat_map(|workload| {
                if workload.is_directional() {
                    Direction::ALL
                        .into_iter()
                        .map(|direction| TestCase {
                            workload,
                            direction: Some(direction),
                        })
                        .collect::<Vec<_>>()
                } else {
                    vec![TestCase {
                        workload,
                        direction: None,
                    }]
                }
            })
            .collect()
    }
}

token_serde!(TestFamily, Direction, Workload, TestCase);
