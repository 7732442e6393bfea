//! Market index membership tables
//!
//! Static configuration data: which tickers belong to which index. Symbols
//! are exchange-suffix-qualified where the provider requires it (".L" London,
//! ".DE" Xetra, ".PA" Paris, ".T" Tokyo, and so on).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

#[rustfmt::skip]
const SP100: &[&str] = &[
    "NVDA", "MSFT", "AAPL", "AMZN", "GOOG", "META", "AVGO", "TSLA", "JPM", "WMT",
    "LLY", "V", "ORCL", "NFLX", "MA", "XOM", "COST", "JNJ", "PG", "HD",
    "BAC", "ABBV", "PLTR", "KO", "PM", "UNH", "CSCO", "IBM", "WFC", "CVX",
    "GE", "TMUS", "CRM", "ABT", "MS", "AMD", "AXP", "LIN", "DIS", "INTU",
    "GS", "NOW", "MRK", "MCD", "T", "UBER", "TXN", "RTX", "BX", "CAT",
    "ISRG", "ACN", "BKNG", "PEP", "VZ", "QCOM", "BA", "SCHW", "BLK", "ADBE",
    "SPGI", "C", "AMGN", "TMO", "AMAT", "HON", "BSX", "NEE", "SYK", "PGR",
    "GEV", "PFE", "DHR", "UNP", "ETN", "GILD", "COF", "TJX", "MU", "DE",
    "PANW", "CMCSA", "ANET", "LRCX", "CRWD", "LOW", "ADP", "KKR", "KLAC", "ADI",
    "VRTX", "COP", "APH", "MDT", "CB", "NKE", "SBUX", "LMT", "MMC", "ICE",
];

#[rustfmt::skip]
const FTSE100: &[&str] = &[
    "III.L", "ADM.L", "AAF.L", "ALW.L", "AAL.L", "ANTO.L", "AHT.L", "ABF.L", "AZN.L", "AUTO.L",
    "AV.L", "BAB.L", "BA.L", "BARC.L", "BTRW.L", "BEZ.L", "BKG.L", "BP.L", "BATS.L", "BT-A.L",
    "BNZL.L", "CNA.L", "CCEP.L", "CCH.L", "CPG.L", "CTEC.L", "CRDA.L", "DCC.L", "DGE.L", "DPLM.L",
    "EDV.L", "ENT.L", "EZJ.L", "EXPN.L", "FCIT.L", "FRES.L", "GAW.L", "GLEN.L", "GSK.L", "HLN.L",
    "HLMA.L", "HIK.L", "HSX.L", "HWDN.L", "HSBA.L", "IHG.L", "IMI.L", "IMB.L", "INF.L", "ICG.L",
    "IAG.L", "ITRK.L", "JD.L", "KGF.L", "LAND.L", "LGEN.L", "LLOY.L", "LMP.L", "LSEG.L", "MNG.L",
    "MKS.L", "MRO.L", "MNDI.L", "NG.L", "NWG.L", "NXT.L", "PSON.L", "PSH.L", "PSN.L", "PHNX.L",
    "PCT.L", "PRU.L", "RKT.L", "REL.L", "RTO.L", "RMV.L", "RIO.L", "RR.L", "SGE.L", "SBRY.L",
    "SDR.L", "SMT.L", "SGRO.L", "SVT.L", "SHEL.L", "SMIN.L", "SN.L", "SPX.L", "SSE.L", "STAN.L",
    "STJ.L", "TW.L", "TSCO.L", "ULVR.L", "UU.L", "UTG.L", "VOD.L", "WEIR.L", "WTB.L", "WPP.L",
];

#[rustfmt::skip]
const STOXX50: &[&str] = &[
    "ADS.DE", "ADYEN.AS", "AD.AS", "AI.PA", "AIR.PA", "ALV.DE", "ABI.BR", "ASML.AS", "CS.PA", "BAS.DE",
    "BAYN.DE", "BBVA.MC", "SAN.MC", "BMW.DE", "BNP.PA", "BN.PA", "DB1.DE", "DHL.DE", "DTE.DE", "ENEL.MI",
    "ENI.MI", "EL.PA", "RACE.MI", "FLTR.L", "RMS.PA", "IBE.MC", "ITX.MC", "IFX.DE", "INGA.AS", "ISP.MI",
    "KER.PA", "OR.PA", "MC.PA", "MBG.DE", "MUV2.DE", "NOKIA.HE", "NDA-FI.HE", "RI.PA", "PRX.AS", "SAF.PA",
    "SGO.PA", "SAN.PA", "SAP.DE", "SU.PA", "SIE.DE", "STLAM.MI", "TTE.PA", "DG.PA", "UCG.MI", "VOW.DE",
];

#[rustfmt::skip]
const CAC40: &[&str] = &[
    "AC.PA", "AI.PA", "AIR.PA", "MT.AS", "CS.PA", "BNP.PA", "EN.PA", "CAP.PA", "CA.PA", "ACA.PA",
    "BN.PA", "DSY.PA", "EDEN.PA", "ENGI.PA", "EL.PA", "ERF.PA", "RMS.PA", "KER.PA", "OR.PA", "LR.PA",
    "MC.PA", "ML.PA", "ORA.PA", "RI.PA", "PUB.PA", "RNO.PA", "SAF.PA", "SGO.PA", "SAN.PA", "SU.PA",
    "GLE.PA", "STLA.PA", "STM.PA", "TEP.PA", "HO.PA", "TTE.PA", "URW.PA", "VIE.PA", "DG.PA", "VIV.PA",
];

#[rustfmt::skip]
const DAX40: &[&str] = &[
    "ADS.DE", "AIR.PA", "ALV.DE", "BAS.DE", "BAYN.DE", "BEI.DE", "BMW.DE", "BNR.DE", "CBK.DE", "CON.DE",
    "1COV.DE", "DTG.DE", "DBK.DE", "DB1.DE", "DHL.DE", "DTE.DE", "EOAN.DE", "FRE.DE", "FME.DE", "HNR1.DE",
    "HEI.DE", "HEN3.DE", "IFX.DE", "MBG.DE", "MRK.DE", "MTX.DE", "MUV2.DE", "P911.DE", "PAH3.DE", "QIA.DE",
    "RHM.DE", "RWE.DE", "SAP.DE", "SRT3.DE", "SIE.DE", "ENR.DE", "SHL.DE", "SY1.DE", "VOW3.DE", "VNA.DE",
    "ZAL.DE",
];

#[rustfmt::skip]
const NIKKEI225: &[&str] = &[
    "7203.T", "8306.T", "6758.T", "6501.T", "9984.T", "7974.T", "8316.T", "9983.T", "6861.T", "8035.T",
    "9432.T", "6098.T", "8766.T", "4519.T", "7011.T", "8058.T", "8001.T", "9434.T", "8411.T", "9433.T",
    "4063.T", "8031.T", "6857.T", "2914.T", "4502.T", "4568.T", "6503.T", "7741.T", "7267.T", "6702.T",
    "6701.T", "6902.T", "6367.T", "6146.T", "4661.T", "3382.T", "8002.T", "8725.T", "8053.T", "6301.T",
];

/// One named index and its member tickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIndex {
    pub name: String,
    pub tickers: Vec<String>,
}

/// Ordered collection of configured indices
///
/// Order matters: summary columns follow configuration order, so this is a
/// list rather than a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexUniverse {
    pub indices: Vec<MarketIndex>,
}

impl IndexUniverse {
    /// The built-in index set
    pub fn builtin() -> Self {
        let defs: [(&str, &[&str]); 6] = [
            ("S&P 100", SP100),
            ("FTSE 100", FTSE100),
            ("STOXX 50", STOXX50),
            ("CAC 40", CAC40),
            ("DAX 40", DAX40),
            ("NIKKEI 225", NIKKEI225),
        ];

        let indices = defs
            .into_iter()
            .map(|(name, tickers)| MarketIndex {
                name: name.to_string(),
                tickers: tickers.iter().map(|t| t.to_string()).collect(),
            })
            .collect();

        Self { indices }
    }

    /// Load a custom universe from a JSON file: an array of
    /// `{"name": ..., "tickers": [...]}` objects
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!(
                "cannot read index file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let indices: Vec<MarketIndex> = serde_json::from_str(&content)?;
        if indices.is_empty() {
            return Err(AppError::Config("index file defines no indices".to_string()));
        }
        Ok(Self { indices })
    }

    /// Look up an index by name, case-insensitive
    pub fn get(&self, name: &str) -> Option<&MarketIndex> {
        self.indices
            .iter()
            .find(|index| index.name.eq_ignore_ascii_case(name))
    }

    /// All index names, in configuration order
    pub fn names(&self) -> Vec<&str> {
        self.indices.iter().map(|index| index.name.as_str()).collect()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
