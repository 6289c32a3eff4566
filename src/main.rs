fn main() -> anyhow::Result<()> {
    net_vox_lib::run()
}
