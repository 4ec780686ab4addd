pub mod helpers;

mod props;
