use std::{
    error::Error,
    fs,
    io::{self, Read},
};

use stadium::{
    domain::core::ReservationGrouper,
    infrastructure::{decode_reservations, encode_groups},
    StadiumConfig,
};
use tracing::{error, info, warn, Level};

fn main() {
    match StadiumConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .with_writer(io::stderr)
                .init();
            if let Err(error) = run(&config) {
                error!("アプリケーションエラー: {}", error);
                std::process::exit(1);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt().with_writer(io::stderr).init();
            error!("設定の読み込みに失敗: {}", error);
            std::process::exit(1);
        }
    }
}

fn run(config: &StadiumConfig) -> Result<(), Box<dyn Error>> {
    let input = std::env::args().nth(1).or_else(|| config.agenda.input.clone());
    let bytes = match &input {
        Some(path) => {
            info!("予約を読み込み: {}", path);
            fs::read(path)?
        }
        None => {
            info!("標準入力から予約を読み込み");
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let reservations = decode_reservations(&bytes)?;
    for conflict in ReservationGrouper::conflicts(&reservations) {
        let (first, second) = (conflict.first(), conflict.second());
        warn!(
            "重複予約: コート {} {} {}-{} と {}-{}",
            first.court_number(),
            first.date(),
            first.start_time(),
            first.end_time(),
            second.start_time(),
            second.end_time()
        );
    }
    let groups = ReservationGrouper::group(&reservations);
    info!("{} 件の予約を {} 行にまとめました", reservations.len(), groups.len());
    println!("{}", encode_groups(&groups, config.agenda.pretty)?);
    Ok(())
}
