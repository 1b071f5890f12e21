fn main() {
    multiversx_sc_meta_lib::cli_main::<delegated_ballot::AbiProvider>();
}
