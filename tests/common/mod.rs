use std::error::Error;

use ldap3::{LdapConnAsync, SearchEntry};
use ldap_record::Entry;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub fn init_tracing() {
	let tracing_filter = EnvFilter::default().add_directive(LevelFilter::DEBUG.into());
	let _ = tracing_subscriber::fmt().with_env_filter(tracing_filter).with_test_writer().try_init();
}

pub async fn ldap_connect() -> Result<ldap3::Ldap, Box<dyn Error>> {
	let (conn, mut ldap) = LdapConnAsync::new("ldap://localhost:1389").await?;
	let _handle = tokio::spawn(async move {
		if let Err(err) = conn.drive().await {
			panic!("Ldap connection error {err}");
		}
	});
	ldap.simple_bind("cn=admin,dc=example,dc=org", "adminpassword").await?;
	Ok(ldap)
}

pub async fn ldap_add_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.add(
		&format!("ou={},dc=example,dc=org", ou),
		vec![("objectClass", ["organizationalUnit"].into())],
	)
	.await?
	.success()?;
	Ok(())
}

pub async fn ldap_delete_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.delete(&format!("ou={},dc=example,dc=org", ou)).await?.success()?;
	Ok(())
}

pub async fn ldap_add_entry(ldap: &mut ldap3::Ldap, entry: &Entry) -> Result<(), Box<dyn Error>> {
	ldap.add(&entry.dn, entry.to_add_attributes()).await?.success()?;
	Ok(())
}

pub async fn ldap_modify_entry(
	ldap: &mut ldap3::Ldap,
	entry: &Entry,
) -> Result<(), Box<dyn Error>> {
	ldap.modify(&entry.dn, entry.to_modifications()).await?.success()?;
	Ok(())
}

pub async fn ldap_delete_entry(ldap: &mut ldap3::Ldap, dn: &str) -> Result<(), Box<dyn Error>> {
	ldap.delete(dn).await?.success()?;
	Ok(())
}

pub async fn ldap_search_entry(
	ldap: &mut ldap3::Ldap,
	dn: &str,
	attributes: Vec<String>,
) -> Result<Entry, Box<dyn Error>> {
	let (result, _res) = ldap
		.search(dn, ldap3::Scope::Base, "(objectClass=*)", attributes)
		.await?
		.success()?;
	let entry = result.first().ok_or("No entry found")?.clone();
	Ok(SearchEntry::construct(entry).into())
}
