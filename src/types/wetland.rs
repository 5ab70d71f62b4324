// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A USDA wetland indicator status.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WetlandStatus {
    /// Obligate wetland.
    Obl,
    /// Facultative wetland.
    Facw,
    /// Facultative.
    Fac,
    /// Facultative upland.
    Facu,
    /// Upland.
    Upl,
    /// No indicator.
    Ni,
}

/// The codes quiz distractors are drawn from. `NI` is deliberately absent.
pub const DISTRACTOR_STATUSES: [WetlandStatus; 5] = [
    WetlandStatus::Obl,
    WetlandStatus::Facw,
    WetlandStatus::Fac,
    WetlandStatus::Facu,
    WetlandStatus::Upl,
];

/// Every status, in legend order.
pub const ALL_STATUSES: [WetlandStatus; 6] = [
    WetlandStatus::Obl,
    WetlandStatus::Facw,
    WetlandStatus::Fac,
    WetlandStatus::Facu,
    WetlandStatus::Upl,
    WetlandStatus::Ni,
];

impl WetlandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WetlandStatus::Obl => "OBL",
            WetlandStatus::Facw => "FACW",
            WetlandStatus::Fac => "FAC",
            WetlandStatus::Facu => "FACU",
            WetlandStatus::Upl => "UPL",
            WetlandStatus::Ni => "NI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WetlandStatus::Obl => "Obligate Wetland - Almost always occurs in wetlands (>99%)",
            WetlandStatus::Facw => "Facultative Wetland - Usually occurs in wetlands (67-99%)",
            WetlandStatus::Fac => {
                "Facultative - Equally likely in wetlands or non-wetlands (34-66%)"
            }
            WetlandStatus::Facu => "Facultative Upland - Usually occurs in non-wetlands (1-33%)",
            WetlandStatus::Upl => "Upland - Almost never occurs in wetlands (<1%)",
            WetlandStatus::Ni => "No Indicator - Insufficient data to determine status",
        }
    }
}

impl Display for WetlandStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WetlandStatus {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OBL" => Ok(WetlandStatus::Obl),
            "FACW" => Ok(WetlandStatus::Facw),
            "FAC" => Ok(WetlandStatus::Fac),
            "FACU" => Ok(WetlandStatus::Facu),
            "UPL" => Ok(WetlandStatus::Upl),
            "NI" => Ok(WetlandStatus::Ni),
            _ => fail(format!("Invalid wetland status: {s}")),
        }
    }
}
