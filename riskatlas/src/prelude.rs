pub use crate::{
    analysis::{config::*, riskanalysis::*},
    history::{pricehistory::*, pricerecord::*, pricestore::*},
    models::{montecarlo::*, randomwalk::*, simulationpath::*, traits::*},
    portfolio::portfolio::*,
    returns::{returnseries::*, returnstatistics::*},
    risk::riskmetrics::*,
    time::date::*,
    utils::errors::*,
};
